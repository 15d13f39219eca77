//! 翻译系统核心模块
//!
//! - **客户端** (`client.rs`): 翻译服务接口及 Papago 实现
//! - **引擎** (`engine.rs`): 单个部件的逐叶翻译
//! - **服务** (`service.rs`): 整个文稿的全有或全无翻译
//!
//! 所有翻译调用都是顺序发出的：部件内逐个叶子，部件之间逐个部件。

pub mod client;
pub mod engine;
pub mod service;

pub use client::{IdentityClient, PapagoClient, RetryPolicy, TranslationClient};
pub use engine::{PartStats, PartTranslator};
pub use service::{LeafRecord, PackageStats, PackageTranslator, TranslatedPackage};
