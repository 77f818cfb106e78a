//! Banner message substitution and markup rendering
//!
//! Pure functions: no I/O, no framework types. The embed route in the
//! server crate glues these onto the resolved banner data.
//!
//! The message template and the mapping values are treated as already
//! sanitized against markup injection — merchants intentionally put HTML
//! in their templates. Only the literal apostrophe is escaped, because
//! the rendered message travels inside a single-quoted JS string.

use crate::models::customization::ProductCustomization;

/// Literal replacements for the three placeholder tokens
#[derive(Debug, Clone)]
pub struct BannerMappings {
    pub country: String,
    pub coupon: String,
    pub discount: String,
}

/// Substitute `{country}`, `{coupon}`, and `{discount}` in a message template.
///
/// Apostrophes in the template are escaped to `&#39;` before substitution.
/// Replacement is global per key; the placeholder sets are disjoint, so key
/// order does not affect the result.
pub fn substitute_message(template: &str, mappings: &BannerMappings) -> String {
    template
        .replace('\'', "&#39;")
        .replace("{country}", &mappings.country)
        .replace("{coupon}", &mappings.coupon)
        .replace("{discount}", &mappings.discount)
}

/// Format a stored discount fraction (0–1) for display as 0–100
pub fn format_discount_percent(fraction: f64) -> String {
    format!("{}", (fraction * 100.0).round() as i64)
}

/// Render the banner markup: a scoped `<style>` block plus the container
/// with the substituted message and, unless the owner's tier removes it,
/// a branding line.
pub fn render_banner(
    customization: &ProductCustomization,
    message_html: &str,
    can_remove_branding: bool,
    server_url: &str,
) -> String {
    let prefix = customization.class_prefix.as_deref().unwrap_or("");
    let sticky = if customization.is_sticky {
        "position: sticky;"
    } else {
        ""
    };

    let style = format!(
        ".{prefix}ppp-banner-container {{\n\
         all: revert;\n\
         display: flex;\n\
         flex-direction: column;\n\
         gap: .5em;\n\
         background-color: {bg};\n\
         color: {fg};\n\
         font-size: {font};\n\
         font-family: inherit;\n\
         padding: 1rem;\n\
         {sticky}\n\
         left: 0;\n\
         right: 0;\n\
         top: 0;\n\
         text-wrap: balance;\n\
         text-align: center;\n\
         }}\n\
         .{prefix}ppp-banner-branding {{\n\
         color: inherit;\n\
         font-size: inherit;\n\
         display: inline-block;\n\
         text-decoration: underline;\n\
         }}",
        bg = customization.background_color,
        fg = customization.text_color,
        font = customization.font_size,
    );

    let branding = if can_remove_branding {
        String::new()
    } else {
        format!(
            "<a class=\"{prefix}ppp-banner-branding\" href=\"{server_url}\">Powered by Parity Cloud</a>"
        )
    };

    format!(
        "<style type=\"text/css\">{style}</style>\
         <div class=\"{prefix}ppp-banner-container {prefix}ppp-banner-override\">\
         <span class=\"{prefix}ppp-banner-message\">{message_html}</span>{branding}</div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn mappings() -> BannerMappings {
        BannerMappings {
            country: "Ukraine".to_string(),
            coupon: "HALF_OFF".to_string(),
            discount: "50".to_string(),
        }
    }

    #[test]
    fn test_substitute_all_placeholders() {
        let out = substitute_message(
            "Visit {country} and save {discount}% with {coupon}",
            &mappings(),
        );
        assert_eq!(out, "Visit Ukraine and save 50% with HALF_OFF");
    }

    #[test]
    fn test_substitute_repeated_placeholders() {
        let out = substitute_message("{coupon} {coupon} {country}", &mappings());
        assert_eq!(out, "HALF_OFF HALF_OFF Ukraine");
    }

    #[test]
    fn test_apostrophe_escaped_before_substitution() {
        let out = substitute_message("it's {discount}% off", &mappings());
        assert_eq!(out, "it&#39;s 50% off");
    }

    #[test]
    fn test_template_without_placeholders_unchanged() {
        let out = substitute_message("plain message", &mappings());
        assert_eq!(out, "plain message");
    }

    #[test]
    fn test_format_discount_percent() {
        assert_eq!(format_discount_percent(0.5), "50");
        assert_eq!(format_discount_percent(0.25), "25");
        assert_eq!(format_discount_percent(1.0), "100");
        assert_eq!(format_discount_percent(0.333), "33");
    }

    #[test]
    fn test_render_banner_includes_branding_by_default() {
        let c = ProductCustomization::defaults(Uuid::new_v4());
        let html = render_banner(&c, "hello", false, "https://example.com");
        assert!(html.contains("Powered by Parity Cloud"));
        assert!(html.contains("ppp-banner-container"));
        assert!(html.contains("position: sticky;"));
    }

    #[test]
    fn test_render_banner_branding_removed() {
        let c = ProductCustomization::defaults(Uuid::new_v4());
        let html = render_banner(&c, "hello", true, "https://example.com");
        assert!(!html.contains("Powered by"));
    }

    #[test]
    fn test_render_banner_class_prefix() {
        let mut c = ProductCustomization::defaults(Uuid::new_v4());
        c.class_prefix = Some("acme-".to_string());
        c.is_sticky = false;
        let html = render_banner(&c, "hi", true, "https://example.com");
        assert!(html.contains("acme-ppp-banner-container"));
        assert!(!html.contains("position: sticky;"));
    }
}
