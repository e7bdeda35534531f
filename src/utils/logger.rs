use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "face_fortune=info";
const VERBOSE_DIRECTIVES: &str = "face_fortune=debug,info";

/// `RUST_LOG` 優先；否則只顯示本 crate 的觀相流程日誌。
pub fn reading_filter_directives(verbose: bool) -> String {
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| {
            if verbose {
                VERBOSE_DIRECTIVES.to_string()
            } else {
                DEFAULT_DIRECTIVES.to_string()
            }
        })
}

fn reading_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_new(reading_filter_directives(verbose))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// 終端機模式：精簡格式寫到 stderr，stdout 留給觀相結果。
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(reading_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// `--json` 報告模式：stdout 是 AnalysisResult JSON，日誌以 JSON 行寫到 stderr。
pub fn init_report_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(reading_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_filter_directives() {
        if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
            return;
        }
        assert_eq!(reading_filter_directives(false), "face_fortune=info");
        assert_eq!(reading_filter_directives(true), "face_fortune=debug,info");
    }
}
