// 集成测试公共模块
//
// 提供测试文稿构建、测试客户端和本地假服务

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use slide_translate::parsers::xml;
use slide_translate::translation::{
    TextLocator, TranslationClient, TranslationError, TranslationResult,
};

pub const SLIDE_A: &str = "ppt/slides/slide1.xml";
pub const SLIDE_B: &str = "ppt/slides/slide2.xml";
pub const IMAGE: &str = "ppt/media/image1.png";
pub const IMAGE_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 13];

/// 文稿构建辅助
pub struct DeckBuilder;

impl DeckBuilder {
    /// 生成包含给定文本的幻灯片 XML，每段文本一个 `a:r`
    pub fn slide_xml(texts: &[&str]) -> String {
        let runs: String = texts
            .iter()
            .map(|text| {
                if text.is_empty() {
                    r#"<a:r><a:rPr lang="en-US"/><a:t></a:t></a:r>"#.to_string()
                } else {
                    format!(
                        r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#,
                        text
                    )
                }
            })
            .collect();

        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
                r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
                r#"<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/></p:nvGrpSpPr>"#,
                r#"<p:sp><p:spPr><a:xfrm><a:off x="838200" y="365125"/></a:xfrm></p:spPr>"#,
                r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p>{}</a:p></p:txBody></p:sp>"#,
                r#"</p:spTree></p:cSld></p:sld>"#
            ),
            runs
        )
    }

    /// 构建文稿：幻灯片按给定顺序写入，另加内容类型、关系和一张图片
    pub fn build(slides: &[(&str, &[&str])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        writer.start_file("[Content_Types].xml", deflated).unwrap();
        writer
            .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="urn:ct"><Default Extension="xml" ContentType="application/xml"/></Types>"#)
            .unwrap();

        writer.start_file("_rels/.rels", deflated).unwrap();
        writer
            .write_all(br#"<Relationships xmlns="urn:rels"><Relationship Id="rId1" Target="ppt/presentation.xml"/></Relationships>"#)
            .unwrap();

        writer.start_file("ppt/presentation.xml", deflated).unwrap();
        writer
            .write_all(br#"<p:presentation xmlns:p="urn:p"><a:t>Not a slide</a:t></p:presentation>"#)
            .unwrap();

        for (path, texts) in slides {
            writer.start_file(*path, deflated).unwrap();
            writer.write_all(Self::slide_xml(texts).as_bytes()).unwrap();

            let rels = path.replace("ppt/slides/", "ppt/slides/_rels/") + ".rels";
            writer.start_file(rels.as_str(), deflated).unwrap();
            writer
                .write_all(br#"<Relationships xmlns="urn:rels"><Relationship Id="rId2" Target="../media/image1.png"/></Relationships>"#)
                .unwrap();
        }

        writer.start_file(IMAGE, stored).unwrap();
        writer.write_all(IMAGE_BYTES).unwrap();

        writer.finish().unwrap().into_inner()
    }

    /// 标准场景：部件 A ["Hello", "", "World"]，部件 B ["Foo"]
    pub fn standard() -> Vec<u8> {
        Self::build(&[
            (SLIDE_A, &["Hello", "", "World"][..]),
            (SLIDE_B, &["Foo"][..]),
        ])
    }
}

/// 按压缩包顺序读出全部条目
pub fn read_entries(bytes: &[u8]) -> Vec<(String, CompressionMethod, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|index| {
            let mut file = archive.by_index(index).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), file.compression(), content)
        })
        .collect()
}

/// 读取某个部件的全部文本节点
pub fn part_texts(bytes: &[u8], path: &str) -> Vec<String> {
    let (_, _, content) = read_entries(bytes)
        .into_iter()
        .find(|(name, _, _)| name == path)
        .unwrap_or_else(|| panic!("part {} missing", path));
    let tree = xml::parse_bytes(&content).unwrap();
    TextLocator::default()
        .texts(&tree)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// 场景中使用的词典
pub fn dictionary() -> HashMap<String, String> {
    [("Hello", "Bonjour"), ("World", "Monde"), ("Foo", "Fou")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// 记录调用顺序并检测并发调用的测试客户端
#[derive(Default)]
pub struct RecordingClient {
    dictionary: HashMap<String, String>,
    fail_on: Option<String>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingClient {
    pub fn new(dictionary: HashMap<String, String>) -> Self {
        Self {
            dictionary,
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationClient for RecordingClient {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> TranslationResult<String> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.calls.lock().unwrap().push(text.to_string());

        // 让出执行权，若调用方并发发起请求就会被观察到
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.as_deref() == Some(text) {
            return Err(TranslationError::Provider {
                status: 429,
                body: "rate limited".to_string(),
            });
        }

        Ok(self
            .dictionary
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}

/// 本地假 Papago 服务
#[derive(Default)]
pub struct FakeProvider {
    pub dictionary: HashMap<String, String>,
    /// 前 N 次请求返回的错误状态
    pub fail_first: usize,
    pub fail_status: u16,
    /// 每次响应前的等待
    pub delay: Duration,
    pub requests: Mutex<Vec<HashMap<String, String>>>,
    pub headers: Mutex<Vec<(String, String)>>,
}

impl FakeProvider {
    pub fn new(dictionary: HashMap<String, String>) -> Self {
        Self {
            dictionary,
            fail_status: 503,
            ..Self::default()
        }
    }

    pub fn failing(mut self, times: usize, status: u16) -> Self {
        self.fail_first = times;
        self.fail_status = status;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn texts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|form| form.get("text").cloned())
            .collect()
    }
}

async fn papago_handler(
    State(provider): State<Arc<FakeProvider>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let attempt = {
        let mut requests = provider.requests.lock().unwrap();
        requests.push(form.clone());
        requests.len()
    };

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    provider.headers.lock().unwrap().push((
        header("X-Naver-Client-Id"),
        header("X-Naver-Client-Secret"),
    ));

    tokio::time::sleep(provider.delay).await;

    if attempt <= provider.fail_first {
        let status = StatusCode::from_u16(provider.fail_status).unwrap();
        return (status, r#"{"errorCode":"fake"}"#).into_response();
    }

    let text = form.get("text").cloned().unwrap_or_default();
    let translated = provider.dictionary.get(&text).cloned().unwrap_or(text);
    Json(serde_json::json!({
        "message": { "result": { "translatedText": translated } }
    }))
    .into_response()
}

/// 假 Papago 路由，挂在 `/papago`
pub fn provider_router(provider: Arc<FakeProvider>) -> Router {
    Router::new()
        .route("/papago", post(papago_handler))
        .with_state(provider)
}

/// 在 `/deck.pptx` 上提供文稿，`/missing.pptx` 返回 404
pub fn deck_router(deck: Vec<u8>) -> Router {
    Router::new()
        .route("/deck.pptx", get(move || async move { deck }))
        .route("/missing.pptx", get(|| async { StatusCode::NOT_FOUND }))
}

/// 在随机端口上启动服务，返回基础地址
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// 不经过代理的HTTP客户端
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
