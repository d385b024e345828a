// 進捗監視機能
// 開始・進捗・ファイル単位の失敗・完了の通知

pub mod implementations;

pub use implementations::{ConsoleProgressReporter, NoOpProgressReporter};
