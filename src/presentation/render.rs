//! Terminal and HTML renderings of a [`Screen`].

use crate::presentation::view::{
    ResultView, ScoreGauge, Screen, ScreenBody, ADVICE_HEADING, COMPLIMENT_HEADING, RESET_LABEL,
    RING_CIRCUMFERENCE,
};
use std::fmt::Write;

pub const TITLE: &str = "AI 观相 · 运势解析";
pub const SUBTITLE: &str = "上传照片 · 探寻你的颜值密码与今日运程";
pub const LOADING_MESSAGE: &str = "正在观相中...";
pub const LOADING_DETAIL: &str = "AI Reading in progress";
pub const UPLOAD_PROMPT: &str = "上传照片";
pub const UPLOAD_HINT: &str = "点击选择或拖放照片至此 (支持 JPG, PNG 等常见格式)";
pub const RESULT_BADGE: &str = "AI PHYSIOGNOMY";
pub const FOOTER: &str = "© 2024 AI Fortune Teller. Powered by Gemini.";

pub fn render_text(screen: &Screen) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", SUBTITLE);
    let _ = writeln!(out);

    if let Some(error) = &screen.error {
        let _ = writeln!(out, "[!] {}", error);
        let _ = writeln!(out);
    }

    match &screen.body {
        ScreenBody::Upload => {
            let _ = writeln!(out, "{}", UPLOAD_PROMPT);
            let _ = writeln!(out, "{}", UPLOAD_HINT);
        }
        ScreenBody::Loading { preview } => {
            let _ = writeln!(out, "{}", LOADING_MESSAGE);
            let _ = writeln!(out, "{}", LOADING_DETAIL);
            if preview.is_some() {
                let _ = writeln!(out, "(预览已就绪)");
            }
        }
        ScreenBody::Result(view) => render_result_text(&mut out, view),
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", FOOTER);
    out
}

fn render_result_text(out: &mut String, view: &ResultView) {
    let _ = writeln!(out, "[{}]", RESULT_BADGE);
    let _ = writeln!(out, "{}  {}", text_gauge(&view.appearance), text_gauge(&view.fortune));
    let _ = writeln!(out);
    let _ = writeln!(out, "    {}", view.poem_lines.0);
    let _ = writeln!(out, "    {}", view.poem_lines.1);
    let _ = writeln!(out);
    let _ = writeln!(out, "◈ {}", COMPLIMENT_HEADING);
    let _ = writeln!(out, "{}", view.compliment);
    let _ = writeln!(out);
    let _ = writeln!(out, "◈ {} ({})", ADVICE_HEADING, view.reading_date);
    let _ = writeln!(out, "{}", view.fortune_advice);
}

fn text_gauge(gauge: &ScoreGauge) -> String {
    const WIDTH: usize = 10;
    let filled = ((gauge.value / 100.0) * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);
    format!(
        "{} {}分 [{}{}]",
        gauge.label,
        gauge.display,
        "█".repeat(filled),
        "░".repeat(WIDTH - filled)
    )
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 產生獨立的 HTML 頁面；所有文字都經過跳脫。
pub fn render_html(screen: &Screen) -> String {
    let mut body = String::new();

    if let Some(error) = &screen.error {
        let _ = writeln!(body, r#"<div class="error">{}</div>"#, escape_html(error));
    }

    match &screen.body {
        ScreenBody::Upload => {
            let _ = writeln!(
                body,
                r#"<section class="upload"><p>{}</p><p class="hint">{}</p></section>"#,
                UPLOAD_PROMPT, UPLOAD_HINT
            );
        }
        ScreenBody::Loading { preview } => {
            let _ = writeln!(body, r#"<section class="loading">"#);
            if let Some(url) = preview {
                let _ = writeln!(body, r#"<img class="preview" src="{}" alt="Uploaded">"#, escape_html(url));
            }
            let _ = writeln!(
                body,
                r#"<p>{}</p><p class="hint">{}</p></section>"#,
                LOADING_MESSAGE, LOADING_DETAIL
            );
        }
        ScreenBody::Result(view) => render_result_html(&mut body, view),
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ background: #0f172a; color: #f1f5f9; font-family: serif; margin: 0; }}
main {{ max-width: 72rem; margin: 0 auto; padding: 4rem 1.5rem; }}
header {{ text-align: center; margin-bottom: 4rem; }}
h1 {{ color: #fcd34d; font-size: 3rem; }}
.error {{ border: 1px solid #ef444455; background: #7f1d1d33; color: #fecaca; padding: 1.5rem; border-radius: 1rem; text-align: center; }}
.result {{ display: grid; grid-template-columns: 1fr 1fr; gap: 4rem; }}
.frame {{ position: relative; }}
.badge {{ position: absolute; top: 1.5rem; left: 1.5rem; background: #0f172acc; color: #fcd34d; padding: 0.25rem 0.75rem; border-radius: 999px; font-size: 0.75rem; letter-spacing: 0.2em; }}
.photo {{ width: 100%; height: 500px; object-fit: cover; border-radius: 2rem; }}
.scores {{ display: flex; justify-content: space-around; }}
.gauge {{ text-align: center; }}
.poem h2 {{ color: #fef3c7; font-size: 2.5rem; text-align: center; }}
footer {{ text-align: center; color: #475569; margin-top: 8rem; }}
</style>
</head>
<body>
<main>
<header><h1>{title}</h1><p>{subtitle}</p></header>
{body}</main>
<footer><p>{footer}</p></footer>
</body>
</html>
"#,
        title = TITLE,
        subtitle = SUBTITLE,
        body = body,
        footer = FOOTER,
    )
}

fn render_result_html(out: &mut String, view: &ResultView) {
    let _ = writeln!(out, r#"<section class="result">"#);
    let _ = writeln!(out, "<div>");
    let _ = writeln!(
        out,
        r#"<div class="frame"><img class="photo" src="{}" alt="Uploaded"><span class="badge">{}</span></div>"#,
        escape_html(&view.image_url),
        RESULT_BADGE
    );
    let _ = writeln!(out, r#"<div class="scores">"#);
    out.push_str(&svg_gauge(&view.appearance));
    out.push_str(&svg_gauge(&view.fortune));
    let _ = writeln!(out, "</div>\n</div>");

    let _ = writeln!(out, "<div>");
    let _ = writeln!(
        out,
        r#"<div class="poem"><h2>{}</h2><h2>{}</h2></div>"#,
        escape_html(&view.poem_lines.0),
        escape_html(&view.poem_lines.1)
    );
    let _ = writeln!(
        out,
        "<h3>◈ {}</h3>\n<p>{}</p>",
        COMPLIMENT_HEADING,
        escape_html(&view.compliment)
    );
    let _ = writeln!(
        out,
        "<h3>◈ {} <small>{}</small></h3>\n<p>{}</p>",
        ADVICE_HEADING,
        escape_html(&view.reading_date),
        escape_html(&view.fortune_advice)
    );
    let _ = writeln!(out, r#"<button type="button">{}</button>"#, RESET_LABEL);
    let _ = writeln!(out, "</div>\n</section>");
}

fn svg_gauge(gauge: &ScoreGauge) -> String {
    format!(
        r##"<div class="gauge">
<svg width="160" height="160" viewBox="0 0 100 100" style="transform: rotate(-90deg)">
<circle cx="50" cy="50" r="45" fill="none" stroke="#1e293b" stroke-width="6"/>
<circle cx="50" cy="50" r="45" fill="none" stroke="#fbbf24" stroke-width="6" stroke-dasharray="{circ}" stroke-dashoffset="{offset:.1}" stroke-linecap="round"/>
</svg>
<div class="score">{display}<span>分</span></div>
<div class="label">{label}</div>
</div>
"##,
        circ = RING_CIRCUMFERENCE,
        offset = gauge.ring_offset,
        display = escape_html(&gauge.display),
        label = gauge.label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AnalysisResult, DataUrl};
    use crate::presentation::state::ViewState;
    use chrono::Utc;

    fn result_screen(poem: &str, compliment: &str) -> Screen {
        Screen::from_state(&ViewState::Result {
            preview: DataUrl::parse("data:image/jpeg;base64,/9j/").unwrap(),
            data: AnalysisResult {
                appearance_score: 88.0,
                compliment: compliment.to_string(),
                poem: poem.to_string(),
                fortune_score: 92.0,
                fortune_advice: "宜静心".to_string(),
            },
            analyzed_at: Utc::now(),
        })
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_text_result() {
        let text = render_text(&result_screen("镜中人面如春晓，气质清雅胜群芳。", "神清气朗"));

        assert!(text.contains("颜值指数 88分"));
        assert!(text.contains("今日运势 92分"));
        assert!(text.contains("    镜中人面如春晓\n    气质清雅胜群芳\n"));
        assert!(text.contains("神清气朗"));
        assert!(text.contains("[AI PHYSIOGNOMY]"));
        assert!(text.ends_with("© 2024 AI Fortune Teller. Powered by Gemini.\n"));
    }

    #[test]
    fn test_render_text_idle_with_error() {
        let screen = Screen::from_state(&ViewState::Idle {
            error: Some("请重试".to_string()),
        });
        let text = render_text(&screen);
        assert!(text.contains("[!] 请重试"));
        assert!(text.contains("上传照片\n点击选择或拖放照片至此 (支持 JPG, PNG 等常见格式)\n"));
    }

    #[test]
    fn test_render_html_escapes_model_text() {
        let html = render_html(&result_screen("甲，乙。", "<script>alert(1)</script>"));

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"src="data:image/jpeg;base64,/9j/""#));
        assert!(html.contains("<h2>甲</h2><h2>乙</h2>"));
        assert!(html.contains(RESET_LABEL));
        assert!(html.contains(r#"<span class="badge">AI PHYSIOGNOMY</span>"#));
        assert!(html.contains("<p>© 2024 AI Fortune Teller. Powered by Gemini.</p>"));
    }

    #[test]
    fn test_render_html_loading() {
        let screen = Screen::from_state(&ViewState::default().begin(
            crate::presentation::state::UploadTicket(1),
        ).unwrap());
        let html = render_html(&screen);
        assert!(html.contains("<p>正在观相中...</p>"));
        assert!(html.contains("AI Reading in progress"));
        assert!(!html.contains("AI PHYSIOGNOMY"));
        assert!(!html.contains("class=\"error\""));
    }
}
