//! Web 服务器主程序入口

use slide_translate::translation::config::load_translation_config;
use slide_translate::web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    slide_translate::logging::init_logging();

    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();
    let mut web_config = WebConfig::default();

    // 简单的命令行参数解析
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                };
                web_config.bind_addr = value.clone();
                i += 2;
            }
            "--port" | "-p" => {
                let Some(port) = args.get(i + 1).and_then(|value| value.parse::<u16>().ok()) else {
                    eprintln!("Error: --port requires a valid port number");
                    std::process::exit(1);
                };
                web_config.port = port;
                i += 2;
            }
            "--env-docs" => {
                print!("{}", slide_translate::env::generate_env_docs());
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    web_config.validate()?;

    // 凭据由每个请求携带，这里只需要服务地址、超时和部件选择
    let translation = load_translation_config();

    let server = WebServer::new(web_config, translation);
    server.start().await?;

    Ok(())
}

fn print_help() {
    println!("Slide Translate Web Server");
    println!();
    println!("USAGE:");
    println!("    slide-translate-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 7080]");
    println!("        --env-docs           Print the supported environment variables");
    println!("    -h, --help               Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    slide-translate-web");
    println!("    slide-translate-web --bind 0.0.0.0 --port 3000");
}
