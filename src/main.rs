//! 命令行入口
//!
//! - `translate`: 翻译本地文稿
//! - `inspect`: 以 JSON 列出幻灯片中的全部文本节点

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use slide_translate::package::PackageOptions;
use slide_translate::translation::{
    ConfigManager, IdentityClient, PackageTranslator, PapagoClient, TranslationClient,
    TranslationConfig,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Configuration file (TOML or JSON); searched in the default locations when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate every slide of a .pptx deck
    Translate {
        /// Source deck
        input: PathBuf,

        /// Output deck
        #[arg(short, long)]
        output: PathBuf,

        /// Source language (defaults to the configured one)
        #[arg(long = "from")]
        source_lang: Option<String>,

        /// Target language (defaults to the configured one)
        #[arg(long = "to")]
        target_lang: Option<String>,

        /// Rebuild the deck without calling the translation provider
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the slide text runs as JSON
    Inspect {
        /// Source deck
        input: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<TranslationConfig, Box<dyn std::error::Error>> {
    let manager = match path {
        Some(path) => ConfigManager::from_file(&path.to_string_lossy())?,
        None => ConfigManager::new()?,
    };
    Ok(manager.into_config())
}

async fn run(args: Arguments) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_ref())?;
    let translator = PackageTranslator::new(PackageOptions::from_config(&config));

    match args.command {
        Command::Translate {
            input,
            output,
            source_lang,
            target_lang,
            dry_run,
        } => {
            let deck = std::fs::read(&input)?;
            let source_lang = source_lang.unwrap_or_else(|| config.source_lang.clone());
            let target_lang = target_lang.unwrap_or_else(|| config.target_lang.clone());

            let client: Box<dyn TranslationClient> = if dry_run {
                tracing::info!("试运行：不调用翻译服务");
                Box::new(IdentityClient)
            } else {
                Box::new(PapagoClient::from_config(&config)?)
            };

            let translated = translator
                .translate_package(&deck, &source_lang, &target_lang, client.as_ref())
                .await?;
            std::fs::write(&output, &translated.bytes)?;

            eprintln!(
                "{} -> {}: {} slides, {} text runs translated, {} blank runs kept",
                input.display(),
                output.display(),
                translated.stats.parts_translated,
                translated.stats.leaves_translated,
                translated.stats.leaves_skipped_blank
            );
        }
        Command::Inspect { input } => {
            let deck = std::fs::read(&input)?;
            let records = translator.inspect(&deck)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    slide_translate::logging::init_logging();
    let args = Arguments::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
