use crate::domain::model::AnalysisResult;
use crate::presentation::state::ViewState;
use chrono::{DateTime, Local, Utc};

pub const SCORE_MIN: f64 = 70.0;
pub const SCORE_MAX: f64 = 100.0;
/// Circumference of the r=45 gauge ring, rounded the way the stroke dash uses it.
pub const RING_CIRCUMFERENCE: f64 = 283.0;

pub const APPEARANCE_LABEL: &str = "颜值指数";
pub const FORTUNE_LABEL: &str = "今日运势";
pub const COMPLIMENT_HEADING: &str = "形象点评";
pub const ADVICE_HEADING: &str = "运势指引";
pub const RESET_LABEL: &str = "再测一次";

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGauge {
    pub label: &'static str,
    pub raw: f64,
    pub value: f64,
    pub display: String,
    pub ring_offset: f64,
    pub in_range: bool,
}

impl ScoreGauge {
    /// 分數落在 70–100 時原樣顯示；超出範圍（或非有限數）則夾回範圍內並記錄警告。
    pub fn new(label: &'static str, score: f64) -> Self {
        let in_range = (SCORE_MIN..=SCORE_MAX).contains(&score);
        let value = if in_range {
            score
        } else if score.is_finite() {
            score.clamp(SCORE_MIN, SCORE_MAX)
        } else {
            SCORE_MIN
        };

        if !in_range {
            tracing::warn!("{} score {} outside [{}, {}], showing {}", label, score, SCORE_MIN, SCORE_MAX, value);
        }

        Self {
            label,
            raw: score,
            value,
            display: format_score(value),
            ring_offset: RING_CIRCUMFERENCE - (RING_CIRCUMFERENCE * value) / 100.0,
            in_range,
        }
    }
}

/// 原樣輸出，不做四捨五入：88 → "88"，88.25 → "88.25"。
pub fn format_score(value: f64) -> String {
    value.to_string()
}

/// 以 `,` `，` `。` 斷句，取前兩句；第二句不存在時為空字串。
pub fn split_poem(poem: &str) -> (String, String) {
    let mut clauses = poem.split([',', '，', '。']);
    let first = clauses.next().unwrap_or_default().trim().to_string();
    let second = clauses.next().unwrap_or_default().trim().to_string();
    (first, second)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub image_url: String,
    pub appearance: ScoreGauge,
    pub fortune: ScoreGauge,
    pub poem_lines: (String, String),
    pub compliment: String,
    pub fortune_advice: String,
    pub reading_date: String,
}

impl ResultView {
    pub fn new(image_url: &str, data: &AnalysisResult, analyzed_at: DateTime<Utc>) -> Self {
        Self {
            image_url: image_url.to_string(),
            appearance: ScoreGauge::new(APPEARANCE_LABEL, data.appearance_score),
            fortune: ScoreGauge::new(FORTUNE_LABEL, data.fortune_score),
            poem_lines: split_poem(&data.poem),
            compliment: data.compliment.clone(),
            fortune_advice: data.fortune_advice.clone(),
            reading_date: analyzed_at
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenBody {
    Upload,
    Loading { preview: Option<String> },
    Result(Box<ResultView>),
}

/// 畫面：可選的錯誤橫幅加上三種主體之一。
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub error: Option<String>,
    pub body: ScreenBody,
}

impl Screen {
    pub fn from_state(state: &ViewState) -> Self {
        match state {
            ViewState::Idle { error } => Screen {
                error: error.clone(),
                body: ScreenBody::Upload,
            },
            ViewState::Loading { preview, .. } => Screen {
                error: None,
                body: ScreenBody::Loading {
                    preview: preview.as_ref().map(|p| p.as_str().to_string()),
                },
            },
            ViewState::Result {
                preview,
                data,
                analyzed_at,
            } => Screen {
                error: None,
                body: ScreenBody::Result(Box::new(ResultView::new(
                    preview.as_str(),
                    data,
                    *analyzed_at,
                ))),
            },
        }
    }

    pub fn result(&self) -> Option<&ResultView> {
        match &self.body {
            ScreenBody::Result(view) => Some(view),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_boundaries_never_panic() {
        let cases = [
            (0.0, "70", false),
            (70.0, "70", true),
            (88.0, "88", true),
            (88.25, "88.25", true),
            (99.96, "99.96", true),
            (100.0, "100", true),
            (150.0, "100", false),
            (-5.0, "70", false),
        ];

        for (score, display, in_range) in cases {
            let gauge = ScoreGauge::new(APPEARANCE_LABEL, score);
            assert_eq!(gauge.display, display, "score {}", score);
            assert_eq!(gauge.in_range, in_range, "score {}", score);
            assert_eq!(gauge.raw, score);
            assert!(gauge.ring_offset >= 0.0 && gauge.ring_offset <= RING_CIRCUMFERENCE);
        }
    }

    #[test]
    fn test_non_finite_score_is_clamped() {
        let gauge = ScoreGauge::new(FORTUNE_LABEL, f64::NAN);
        assert!(!gauge.in_range);
        assert_eq!(gauge.display, "70");

        let gauge = ScoreGauge::new(FORTUNE_LABEL, f64::INFINITY);
        assert_eq!(gauge.display, "70");
    }

    #[test]
    fn test_ring_offset() {
        assert_eq!(ScoreGauge::new(FORTUNE_LABEL, 100.0).ring_offset, 0.0);
        let gauge = ScoreGauge::new(FORTUNE_LABEL, 80.0);
        assert!((gauge.ring_offset - 56.6).abs() < 1e-9);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(92.0), "92");
        assert_eq!(format_score(92.5), "92.5");
        assert_eq!(format_score(70.125), "70.125");
    }

    #[test]
    fn test_split_poem() {
        assert_eq!(
            split_poem("镜中人面如春晓，气质清雅胜群芳。"),
            ("镜中人面如春晓".to_string(), "气质清雅胜群芳".to_string())
        );
        assert_eq!(
            split_poem("Spring face, graceful air."),
            ("Spring face".to_string(), "graceful air.".to_string())
        );
        assert_eq!(split_poem("一句而已"), ("一句而已".to_string(), String::new()));
        assert_eq!(split_poem(""), (String::new(), String::new()));
    }

    #[test]
    fn test_screen_from_idle_with_error() {
        let screen = Screen::from_state(&ViewState::Idle {
            error: Some("oops".to_string()),
        });
        assert_eq!(screen.error.as_deref(), Some("oops"));
        assert_eq!(screen.body, ScreenBody::Upload);
        assert!(screen.result().is_none());
    }
}
