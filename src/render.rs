//! Turns a [`ViewState`] snapshot into output. Rendering never touches the
//! view; callers re-render after each change.

use lazy_static::lazy_static;
use minijinja::{context, Environment, Value};

use crate::error::AppError;
use crate::helpers::{format_date, if_true};
use crate::view::ViewState;

const PAGE_HTML: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>{% if state.search_string %}{{ state.search_string }} - {% endif %}Images</title>
</head>
<body>
<form class="search" action="/search" method="get">
  <input type="search" name="q" value="{{ state.search_string }}" autofocus>
  <button type="submit">Search</button>
</form>
{% if state.error %}
<div class="error">{{ state.error }}</div>
{% elif state.images is none %}
<div class="loading">Loading...</div>
{% else %}
{% if state.page and state.page.ResultCount is defined %}
<p class="count">{{ state.page.Count }} of {{ state.page.ResultCount }} images</p>
{% endif %}
<ul class="images">
{% for image in state.images %}
  <li class="image{{ if_true(image.showImg, ' expanded') }}">
    {% if image.ThumbImg %}<img class="thumb" src="{{ image.ThumbImg }}" alt="">{% endif %}
    <span class="name">{{ image.Filename }}</span>
    <time>{{ to_date(image.AddDate) }}</time>
    {% if image.Comment %}<span class="comment">{{ image.Comment }}</span>{% endif %}
    <form action="/images/{{ image.Id }}/toggle" method="post">
      <button type="submit">{{ "Hide" if image.showImg else "Show" }}</button>
    </form>
    {% if image.showImg %}<img class="processed" src="{{ image.procURL or image.CleanImg }}" alt="">{% endif %}
  </li>
{% else %}
  <li class="empty">No images</li>
{% endfor %}
</ul>
{% endif %}
</body>
</html>
"#;

const PAGE_TEXT: &str = r#"{% if state.search_string %}Search: {{ state.search_string }}
{% endif %}{% if state.error %}Error: {{ state.error }}
{% elif state.images is none %}Loading...
{% else %}{% for image in state.images %}{{ image.Id }}	{{ to_date(image.AddDate) or "-" }}	{{ image.Filename }}{% if image.Comment %}	{{ image.Comment }}{% endif %}
{% else %}No images
{% endfor %}{% endif %}"#;

lazy_static! {
    static ref TEMPLATES: Environment<'static> = {
        let mut env = Environment::new();
        env.add_function("if_true", |cond: Value, text: String| {
            if_true(cond.is_true(), &text).to_string()
        });
        env.add_function("to_date", format_date);
        env
    };
}

/// The page, HTML-escaped.
pub fn render_html(state: &ViewState) -> Result<String, AppError> {
    Ok(TEMPLATES.render_named_str("page.html", PAGE_HTML, context! { state })?)
}

/// One line per image, for terminals.
pub fn render_text(state: &ViewState) -> Result<String, AppError> {
    Ok(TEMPLATES.render_named_str("page.txt", PAGE_TEXT, context! { state })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageRecord, PageInfo};
    use crate::location::Location;

    fn state_with(images: Vec<ImageRecord>) -> ViewState {
        ViewState {
            search_string: "cat".into(),
            images: Some(images),
            location: Location::with_search("cat"),
            ..Default::default()
        }
    }

    fn image(id: i64, filename: &str) -> ImageRecord {
        ImageRecord {
            id,
            filename: filename.into(),
            add_date: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn error_replaces_the_list() {
        let state = ViewState {
            error: Some("timeout".into()),
            ..state_with(vec![image(1, "a.jpg")])
        };

        let html = render_html(&state).unwrap();

        assert!(html.contains(r#"<div class="error">timeout</div>"#));
        assert!(!html.contains("a.jpg"));
        assert!(!html.contains(r#"<ul class="images">"#));
    }

    #[test]
    fn missing_results_render_as_loading() {
        let html = render_html(&ViewState::default()).unwrap();
        assert!(html.contains("Loading..."));

        let text = render_text(&ViewState::default()).unwrap();
        assert!(text.contains("Loading..."));
    }

    #[test]
    fn lists_images_with_dates() {
        let html = render_html(&state_with(vec![image(1, "a.jpg"), image(2, "b.jpg")])).unwrap();

        assert!(html.contains(r#"value="cat""#));
        assert!(html.contains("a.jpg"));
        assert!(html.contains("b.jpg"));
        assert!(html.contains("<time>1970-01-01 00:16:40</time>"));
        assert!(html.contains(r#"action="/images/2/toggle""#));
        assert!(html.contains(r#"<li class="image">"#));
    }

    #[test]
    fn empty_result_says_so() {
        let html = render_html(&state_with(Vec::new())).unwrap();
        assert!(html.contains("No images"));
    }

    #[test]
    fn toggled_image_shows_the_processed_version() {
        let mut shown = image(1, "a.jpg");
        shown.show_img = true;
        shown.clean_img = Some("/static/a-clean.jpg".into());
        let mut derived = image(2, "b.jpg");
        derived.show_img = true;
        derived.proc_url = Some("static/f2processed.jpg".into());

        let html = render_html(&state_with(vec![shown, derived])).unwrap();

        assert!(html.contains(r#"<li class="image expanded">"#));
        // attribute values are escaped, slashes included
        assert!(html.contains(r#"<img class="processed" src="&#x2f;static&#x2f;a-clean.jpg""#));
        assert!(html.contains(r#"<img class="processed" src="static&#x2f;f2processed.jpg""#));
        assert!(html.contains("Hide"));
    }

    #[test]
    fn page_counts_are_shown() {
        let state = ViewState {
            page: Some(PageInfo {
                count: Some(20),
                result_count: Some(41),
                ..Default::default()
            }),
            ..state_with(vec![image(1, "a.jpg")])
        };

        let html = render_html(&state).unwrap();
        assert!(html.contains("20 of 41 images"));
    }

    #[test]
    fn html_is_escaped() {
        let html = render_html(&state_with(vec![image(1, "<script>x</script>")])).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn text_lines_per_image() {
        let mut undated = image(2, "b.jpg");
        undated.add_date = 0;
        undated.comment = "blurry".into();

        let text = render_text(&state_with(vec![image(1, "a.jpg"), undated])).unwrap();

        assert!(text.starts_with("Search: cat\n"));
        assert!(text.contains("1\t1970-01-01 00:16:40\ta.jpg\n"));
        assert!(text.contains("2\t-\tb.jpg\tblurry"));
    }

    #[test]
    fn text_shows_the_error() {
        let state = ViewState {
            error: Some("partial".into()),
            ..Default::default()
        };
        assert_eq!(render_text(&state).unwrap().trim(), "Error: partial");
    }
}
