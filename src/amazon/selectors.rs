//! CSS selectors for Amazon product detail pages.
//!
//! Update this file when Amazon changes their HTML structure. Selectors
//! cover both the Japanese and English layouts of the detail page.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the product detail page.
pub mod product {
    use super::*;

    /// Product title.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#productTitle, \
             h1.product-title, \
             #title span",
        )
        .unwrap()
    });

    /// Price candidates, tried in order until one has text.
    pub static PRICES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        [
            ".a-price .a-offscreen",
            "#priceblock_ourprice",
            "#priceblock_dealprice",
            ".a-price-whole",
            "#corePrice_feature_div .a-price .a-offscreen",
            ".priceToPay .a-offscreen",
        ]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
    });

    /// Rating text candidates, tried in order.
    pub static RATINGS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        [
            "span[data-hook='rating-out-of-text']",
            "#acrPopover span.a-icon-alt",
            "i.a-icon-star span",
            "span.a-icon-alt",
        ]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
    });

    /// Review count next to the rating.
    pub static REVIEW_COUNT: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#acrCustomerReviewText, \
             #acrCustomerReviewLink span",
        )
        .unwrap()
    });

    /// Main product image.
    pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#landingImage, \
             img[data-old-hires], \
             #imgBlkFront, \
             .a-dynamic-image",
        )
        .unwrap()
    });

    /// Byline ("Visit the X Store", "ブランド: X").
    pub static BYLINE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#bylineInfo").unwrap());

    /// Brand row of the product overview table.
    pub static PO_BRAND: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".po-brand .po-break-word").unwrap());

    /// Hidden ASIN input (fallback when the URL has none).
    pub static ASIN_INPUT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("input[name='ASIN']").unwrap());

    /// Visible feature bullets.
    pub static FEATURES: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("#feature-bullets li:not(.aok-hidden) .a-list-item").unwrap()
    });

    /// Breadcrumb links.
    pub static BREADCRUMBS: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#wayfinding-breadcrumbs_feature_div a, \
             .a-breadcrumb a",
        )
        .unwrap()
    });
}

/// Selectors for the specification sources, merged in this order.
pub mod specs {
    use super::*;

    /// Technical specification and detail tables.
    pub static TABLE_ROW: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#productDetails_techSpec_section_1 tr, \
             #productDetails_detailBullets_sections1 tr",
        )
        .unwrap()
    });

    pub static TABLE_LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());

    pub static TABLE_VALUE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

    /// "Label : value" detail bullets.
    pub static DETAIL_BULLET: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#detailBullets_feature_div li").unwrap());

    /// Definition-list style key/value blocks.
    pub static KEY_VALUE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".a-keyvalue").unwrap());

    pub static KEY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dt").unwrap());

    pub static VALUE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dd").unwrap());
}

/// Selectors for detecting error/captcha pages.
pub mod errors {
    use super::*;

    /// CAPTCHA form.
    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form[action*='validateCaptcha'], \
             img[src*='captcha']",
        )
        .unwrap()
    });

    /// Dog page (Amazon's error page).
    pub static DOG_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "img[alt*='dog'], \
             .a-box-inner a[href='/ref=cs_503_link']",
        )
        .unwrap()
    });
}
