// 結果の集約とレポート永続化
// タスク結果の収集、stats.txt / stats.json の書き出し

pub mod collector;
pub mod implementations;

// 公開API
pub use collector::spawn_result_collector;
pub use implementations::{
    render_text_report, report_paths, FanOutReportPersistence, JsonReportPersistence,
    MemoryReportPersistence, TextReportPersistence, JSON_REPORT_FILENAME, TEXT_REPORT_FILENAME,
};
