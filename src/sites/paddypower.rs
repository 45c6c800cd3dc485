//! PaddyPower: search-driven flow and outright-coupon extraction.

use super::{SiteFlow, SiteOdds};
use crate::error::SessionError;
use crate::renderer::Locator;
use crate::session::Session;
use async_trait::async_trait;
use scraper::{Html, Selector};

/// Search query that lands on the competition's outright market.
const COMPETITION_QUERY: &str = "World Cup 2026";

/// The winner-market coupon widget binds its own event dispatch; synthetic
/// pointer events bounce off the show-more control, so it has to be clicked
/// programmatically from inside the page.
const SHOW_MORE_SCRIPT: &str = r#"(() => {
    const buttons = document.querySelectorAll('button.outright-coupon-card__show-more');
    buttons.forEach(b => b.click());
    return buttons.length;
})()"#;

pub struct PaddyPowerFlow;

#[async_trait]
impl SiteFlow for PaddyPowerFlow {
    fn name(&self) -> &'static str {
        "paddypower"
    }

    fn base_url(&self) -> &'static str {
        "https://www.paddypower.com/football"
    }

    async fn prepare_page_content(&self, session: &mut Session) -> Result<(), SessionError> {
        session
            .accept_cookies_once(&Locator::id("onetrust-accept-btn-handler"))
            .await?;

        session
            .click(&Locator::css("button.search-overlay-toggle"), "open search")
            .await?;
        session
            .click(&Locator::id("search-input"), "focus search box")
            .await?;
        session
            .type_text(
                &Locator::id("search-input"),
                COMPETITION_QUERY,
                "competition query",
            )
            .await?;
        session
            .click(
                &Locator::xpath("(//a[contains(@class,'search-result-item')])[1]"),
                "first search result",
            )
            .await?;
        session
            .click(
                &Locator::xpath("//span[normalize-space(text())='Winner']/ancestor::button[1]"),
                "expand winner section",
            )
            .await?;

        session.execute_js(SHOW_MORE_SCRIPT, "show all runners").await?;
        Ok(())
    }
}

pub struct PaddyPowerOdds;

impl SiteOdds for PaddyPowerOdds {
    fn transform(&self, content: &str) -> (Vec<String>, Vec<String>) {
        let document = Html::parse_document(content);
        let card_sel = Selector::parse("div.outright-coupon-card").unwrap();
        let name_sel = Selector::parse("span.outright-item__name").unwrap();
        let odds_sel = Selector::parse("span.outright-item__odds").unwrap();

        // The first coupon card on the page holds unrelated content; the
        // winner market is always the second, distinguished only by position.
        let Some(card) = document.select(&card_sel).nth(1) else {
            return (Vec::new(), Vec::new());
        };

        let teams = card
            .select(&name_sel)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect();
        let odds = card
            .select(&odds_sel)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect();
        (teams, odds)
    }
}
