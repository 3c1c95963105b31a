//! ohm-reader: 色環検出の一括読み取り・確認ツール
//!
//! 読み取りロジックは ohm-reader-common にあり、このクレートは
//! ファイル走査・並列実行・出力・対話確認・設定を担う。

pub mod batch;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod export;
pub mod scanner;
pub mod sequence;
