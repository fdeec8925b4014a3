//! Notification template rendering.
//!
//! Titles recognize `{title}` and `{blogTitle}`; bodies additionally recognize
//! `{author}`, `{content}`, `{permalink}` and `{status}`. Substitution is a
//! single pass with no escaping (see [`substitute_placeholders`]).
//!
//! # Example
//!
//! ```ignore
//! let fields = NotificationFields::from_comment(&comment, post_title, &site);
//! let rendered = fields.render("{blogTitle} 收到了新评论", "{author}: {content}");
//! ```

mod substitution;

pub use substitution::substitute_placeholders;

use serde::Serialize;

use crate::comment::{Comment, CommentStatus};

pub const DEFAULT_AUTHOR: &str = "匿名";
pub const DEFAULT_CONTENT: &str = "(无内容)";
pub const DEFAULT_POST_TITLE: &str = "未知文章";
pub const DEFAULT_BLOG_TITLE: &str = "博客";

pub const STATUS_LABEL_APPROVED: &str = "已通过";
pub const STATUS_LABEL_PENDING: &str = "待审核";
pub const STATUS_LABEL_UNKNOWN: &str = "未知";

/// Site-level values available to templates.
#[derive(Debug, Clone, Default)]
pub struct SiteInfo {
    pub title: String,
    pub url: String,
}

/// Resolved placeholder values for one comment.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationFields {
    pub author: String,
    pub title: String,
    pub content: String,
    pub permalink: String,
    pub status: String,
    pub blog_title: String,
}

/// A rendered title/body pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedNotification {
    pub title: String,
    pub body: String,
}

impl NotificationFields {
    /// Resolve fields from a comment, falling back to fixed defaults for
    /// anything missing.
    pub fn from_comment(comment: &Comment, post_title: Option<&str>, site: &SiteInfo) -> Self {
        Self {
            author: non_empty_or(comment.author.as_deref(), DEFAULT_AUTHOR),
            title: non_empty_or(post_title, DEFAULT_POST_TITLE),
            content: comment
                .text
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
            permalink: build_permalink(&site.url, comment.cid, comment.coid),
            status: status_label(comment.status).to_string(),
            blog_title: non_empty_or(Some(site.title.as_str()), DEFAULT_BLOG_TITLE),
        }
    }

    pub fn render_title(&self, template: &str) -> String {
        substitute_placeholders(
            template,
            &[("title", self.title.as_str()), ("blogTitle", self.blog_title.as_str())],
        )
    }

    pub fn render_body(&self, template: &str) -> String {
        substitute_placeholders(
            template,
            &[
                ("author", self.author.as_str()),
                ("title", self.title.as_str()),
                ("content", self.content.as_str()),
                ("permalink", self.permalink.as_str()),
                ("status", self.status.as_str()),
                ("blogTitle", self.blog_title.as_str()),
            ],
        )
    }

    pub fn render(&self, title_template: &str, body_template: &str) -> RenderedNotification {
        RenderedNotification {
            title: self.render_title(title_template),
            body: self.render_body(body_template),
        }
    }
}

/// Two-valued human label for `{status}`.
pub fn status_label(status: Option<CommentStatus>) -> &'static str {
    match status {
        Some(CommentStatus::Approved) => STATUS_LABEL_APPROVED,
        Some(_) => STATUS_LABEL_PENDING,
        None => STATUS_LABEL_UNKNOWN,
    }
}

/// Build the comment link the host serves: `?cid=` (or `&cid=` when the site
/// URL already has a query) plus a `#comment-` anchor for saved comments.
pub fn build_permalink(site_url: &str, cid: i64, coid: i64) -> String {
    let separator = if site_url.contains('?') { '&' } else { '?' };
    let mut link = format!("{site_url}{separator}cid={cid}");

    if coid > 0 {
        link.push_str(&format!("#comment-{coid}"));
    }

    link
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteInfo {
        SiteInfo {
            title: "My Blog".to_string(),
            url: "https://x.io/blog".to_string(),
        }
    }

    fn comment() -> Comment {
        Comment {
            coid: 7,
            cid: 42,
            author: Some("alice".to_string()),
            text: Some("nice post".to_string()),
            status: Some(CommentStatus::Pending),
        }
    }

    #[test]
    fn test_permalink_with_fragment() {
        assert_eq!(
            build_permalink("https://x.io/blog", 42, 7),
            "https://x.io/blog?cid=42#comment-7"
        );
    }

    #[test]
    fn test_permalink_existing_query_without_fragment() {
        assert_eq!(
            build_permalink("https://x.io/blog?lang=en", 42, 0),
            "https://x.io/blog?lang=en&cid=42"
        );
    }

    #[test]
    fn test_fields_from_comment() {
        let fields = NotificationFields::from_comment(&comment(), Some("Hello"), &site());
        assert_eq!(fields.author, "alice");
        assert_eq!(fields.title, "Hello");
        assert_eq!(fields.permalink, "https://x.io/blog?cid=42#comment-7");
        assert_eq!(fields.status, STATUS_LABEL_PENDING);
        assert_eq!(fields.blog_title, "My Blog");
    }

    #[test]
    fn test_fields_fallbacks() {
        let bare = Comment {
            cid: 3,
            ..Default::default()
        };
        let fields = NotificationFields::from_comment(&bare, None, &SiteInfo::default());
        assert_eq!(fields.author, DEFAULT_AUTHOR);
        assert_eq!(fields.content, DEFAULT_CONTENT);
        assert_eq!(fields.title, DEFAULT_POST_TITLE);
        assert_eq!(fields.blog_title, DEFAULT_BLOG_TITLE);
        assert_eq!(fields.status, STATUS_LABEL_UNKNOWN);
        assert_eq!(fields.permalink, "?cid=3");
    }

    #[test]
    fn test_status_label_is_two_valued() {
        assert_eq!(status_label(Some(CommentStatus::Approved)), STATUS_LABEL_APPROVED);
        assert_eq!(status_label(Some(CommentStatus::Pending)), STATUS_LABEL_PENDING);
        assert_eq!(status_label(Some(CommentStatus::Spam)), STATUS_LABEL_PENDING);
    }

    #[test]
    fn test_title_ignores_body_placeholders() {
        let fields = NotificationFields::from_comment(&comment(), Some("Hello"), &site());
        let title = fields.render_title("{blogTitle}: {title} by {author}");
        assert_eq!(title, "My Blog: Hello by {author}");
    }

    #[test]
    fn test_render_body_all_placeholders() {
        let fields = NotificationFields::from_comment(&comment(), Some("Hello"), &site());
        let body = fields.render_body("{author}|{title}|{content}|{permalink}|{status}|{blogTitle}");
        assert_eq!(
            body,
            "alice|Hello|nice post|https://x.io/blog?cid=42#comment-7|待审核|My Blog"
        );
    }
}
