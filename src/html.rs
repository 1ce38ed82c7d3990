use crate::block::{Block, Span};
use crate::config::{RenderConfig, Theme};

/// Convert blocks to an HTML fragment, one block per line
pub fn blocks_to_html(blocks: &[Block], config: &RenderConfig) -> String {
    let mut out = String::new();

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        emit_block(block, config.escape_text, &mut out);
    }

    out
}

fn emit_block(block: &Block, escape: bool, out: &mut String) {
    match block {
        Block::Heading { level, text } => {
            let tag = if *level == 1 { "h3" } else { "h2" };
            out.push('<');
            out.push_str(tag);
            out.push('>');
            push_text(text, escape, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Block::Paragraph { content } => {
            out.push_str("<p class=\"card-p\">");
            spans_to_html(content, escape, out);
            out.push_str("</p>");
        }
        Block::List { items } => {
            out.push_str("<ul>\n");
            for item in items {
                out.push_str("  <li>");
                spans_to_html(item, escape, out);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>");
        }
        Block::Label { text } => {
            out.push_str("<p class=\"label\">");
            push_text(text, escape, out);
            out.push_str("</p>");
        }
        Block::Source { content } => {
            out.push_str("<p class=\"source\">");
            spans_to_html(content, escape, out);
            out.push_str("</p>");
        }
    }
}

fn spans_to_html(spans: &[Span], escape: bool, out: &mut String) {
    for span in spans {
        match span {
            Span::Text(text) => push_text(text, escape, out),
            Span::Bold(text) => {
                out.push_str("<strong>");
                push_text(text, escape, out);
                out.push_str("</strong>");
            }
        }
    }
}

fn push_text(text: &str, escape: bool, out: &mut String) {
    if !escape {
        out.push_str(text);
        return;
    }
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}

/// Wrap a fragment in the full email document.
///
/// Pure substitution: neither the fragment nor the theme's text fields are
/// escaped. The style block carries the light and dark variants plus the
/// Gmail `data-ogsc`/`data-ogsb` overrides.
pub fn build_document(fragment: &str, theme: &Theme) -> String {
    let accent = &theme.accent;
    let header_background = theme.header_background();
    let body_background = match &theme.header_gradient {
        Some(gradient) => format!(
            "background-color: {};\n            background-image: {};",
            theme.header_color, gradient
        ),
        None => format!("background-color: {};", theme.header_color),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="color-scheme" content="light dark">
    <meta name="supported-color-schemes" content="light dark">
    <title>{title}</title>
    <style>
        :root {{
            color-scheme: light dark;
            supported-color-schemes: light dark;
        }}

        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
            -webkit-text-size-adjust: none;
        }}

        body {{
            font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
            {body_background}
            margin: 0;
            padding: 40px 20px;
            color: #1a1a1a;
            line-height: 1.75;
        }}

        .container {{
            max-width: 620px;
            margin: 0 auto;
            background-color: #ffffff;
            border-radius: 20px;
            overflow: hidden;
            box-shadow: 0 20px 60px rgba(0,0,0,0.25);
        }}

        .email-header {{
            background: {header_background};
            padding: 36px 40px 28px;
            text-align: center;
        }}
        .email-header h1 {{
            color: #ffffff;
            font-size: 26px;
            font-weight: 800;
            letter-spacing: -0.3px;
            margin-bottom: 6px;
        }}
        .subtitle {{
            color: rgba(255,255,255,0.82);
            font-size: 13px;
            letter-spacing: 0.3px;
        }}

        .content {{
            padding: 32px 40px;
            font-size: 15px;
            color: #2d3748;
        }}

        /* Summary banner */
        h3 {{
            font-size: 13px;
            font-weight: 700;
            color: #fff;
            background: {accent};
            padding: 10px 18px;
            border-radius: 6px;
            text-align: center;
            margin-bottom: 16px;
            text-transform: uppercase;
            letter-spacing: 1px;
        }}

        h3 + p {{
            background: #f0f4ff;
            border-left: 4px solid {accent};
            padding: 14px 16px;
            border-radius: 0 8px 8px 0;
            font-size: 14px;
            color: #3a4660;
            margin-bottom: 28px;
        }}

        /* Card title */
        h2 {{
            font-size: 17px;
            font-weight: 700;
            color: #1a202c;
            margin-top: 32px;
            margin-bottom: 0;
            padding: 18px 20px 12px;
            background: #f8faff;
            border-top: 3px solid {accent};
            border-radius: 10px 10px 0 0;
        }}

        h2 ~ p,
        h2 ~ ul,
        h2 ~ p.label,
        h2 ~ p.source {{
            background: #f8faff;
            padding: 0 20px;
        }}

        h2 ~ *:last-child {{
            border-radius: 0 0 10px 10px;
            padding-bottom: 18px;
        }}

        p.label {{
            font-size: 11px;
            font-weight: 700;
            color: {accent};
            text-transform: uppercase;
            letter-spacing: 0.8px;
            margin-top: 14px;
            margin-bottom: 2px;
            padding: 0 20px;
            background: #f8faff;
            display: block;
        }}

        p {{
            margin: 4px 0 10px;
            line-height: 1.75;
        }}

        p.source {{
            font-size: 12px;
            color: #718096;
            font-style: italic;
            border-top: 1px solid #e2e8f0;
            margin-top: 12px;
            padding-top: 10px;
        }}

        ul {{
            margin: 10px 0 10px 0;
            padding-left: 24px;
            background: #f8faff;
        }}
        li {{
            margin-bottom: 8px;
            line-height: 1.6;
        }}

        strong {{
            font-weight: 700;
            color: #1a202c;
        }}

        .footer {{
            text-align: center;
            padding: 20px 40px 28px;
            border-top: 1px solid #e8edf5;
            color: #a0aec0;
            font-size: 12px;
        }}

        @media (prefers-color-scheme: dark) {{
            body {{
                background-color: #0f0f12 !important;
                background-image: none !important;
            }}
            .container {{
                background-color: #1a1a2e !important;
                border: 1px solid #2d2d44 !important;
            }}
            .email-header {{
                opacity: 0.95;
            }}
            .content {{
                color: #e2e8f0 !important;
                background-color: #1a1a2e !important;
            }}
            h2 {{
                color: #f0f4ff !important;
                background: #12122a !important;
            }}
            p.card-p, p.label, p.source, ul, li {{
                background: #12122a !important;
                color: #cbd5e0 !important;
            }}
            h3 + p.card-p {{
                background: #1e1e38 !important;
                color: #a0b4d0 !important;
                border-left-color: {accent} !important;
            }}
            p.label {{
                color: {accent} !important;
                opacity: 0.9;
            }}
            p.source {{
                color: #718096 !important;
                border-top-color: #2d2d44 !important;
            }}
            strong {{
                color: #e2e8f0 !important;
            }}
            .footer {{
                color: #4a5568 !important;
                border-top-color: #2d2d44 !important;
                background-color: #1a1a2e !important;
            }}
        }}

        /* Gmail dark mode */
        [data-ogsc] .container, [data-ogsb] .container {{ background-color: #1a1a2e !important; }}
        [data-ogsc] .content, [data-ogsb] .content {{ color: #e2e8f0 !important; background-color: #1a1a2e !important; }}
        [data-ogsc] h2, [data-ogsb] h2 {{ color: #f0f4ff !important; background: #12122a !important; }}
        [data-ogsc] p.card-p, [data-ogsb] p.card-p {{ color: #cbd5e0 !important; background: #12122a !important; }}
        [data-ogsc] li, [data-ogsb] li {{ color: #cbd5e0 !important; background: #12122a !important; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="email-header">
            <h1>{title}</h1>
            <p class="subtitle">{subtitle}</p>
        </div>
        <div class="content">
            {fragment}
        </div>
        <div class="footer">
            <p>{footer}</p>
        </div>
    </div>
</body>
</html>"#,
        title = theme.title,
        subtitle = theme.subtitle,
        footer = theme.footer,
    )
}
