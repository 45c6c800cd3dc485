//! Betfair exchange: menu-path flow and hover-populated odds extraction.

use super::{SiteFlow, SiteOdds};
use crate::error::SessionError;
use crate::renderer::Locator;
use crate::session::Session;
use async_trait::async_trait;
use scraper::{Html, Selector};

/// Lay-side bet button class; odds appear in these buttons' `title`
/// attributes, but only after the button has seen a hover.
const LAY_BUTTON_CLASS: &str = "lay mv-bet-button lay-button lay-selection-button";

/// No single hover populates every button, so dispatch a bubbling mouseover
/// to all of them and let the page fill the titles in.
const HOVER_ALL_SCRIPT: &str = r#"(() => {
    const ev = new MouseEvent('mouseover', { bubbles: true, cancelable: true });
    const buttons = document.querySelectorAll('button');
    buttons.forEach(b => b.dispatchEvent(ev));
    return buttons.length;
})()"#;

pub struct BetfairFlow;

#[async_trait]
impl SiteFlow for BetfairFlow {
    fn name(&self) -> &'static str {
        "betfair"
    }

    fn base_url(&self) -> &'static str {
        "https://www.betfair.com"
    }

    async fn prepare_page_content(&self, session: &mut Session) -> Result<(), SessionError> {
        session
            .accept_cookies_once(&Locator::id("onetrust-accept-btn-handler"))
            .await?;

        // Fixed menu path down to the competition's winner market.
        session
            .click(&Locator::link_text("Exchange"), "open exchange")
            .await?;
        session
            .click(&Locator::link_text("Football"), "football section")
            .await?;
        session
            .click(&Locator::link_text("International"), "international section")
            .await?;
        session
            .click(&Locator::link_text("World Cup 2026"), "competition")
            .await?;
        session
            .click(&Locator::link_text("Winner"), "winner market")
            .await?;

        session.execute_js(HOVER_ALL_SCRIPT, "hover all buttons").await?;
        // Title population is asynchronous with no completion signal; a fixed
        // settle delay is the only synchronization available.
        session.settle().await;
        Ok(())
    }
}

pub struct BetfairOdds;

impl SiteOdds for BetfairOdds {
    fn transform(&self, content: &str) -> (Vec<String>, Vec<String>) {
        let document = Html::parse_document(content);
        let name_sel = Selector::parse("h3.runner-name").unwrap();
        let button_sel = Selector::parse(
            "button.lay.mv-bet-button.lay-button.lay-selection-button",
        )
        .unwrap();

        let teams = document
            .select(&name_sel)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect();
        // A button that never got its hover has no title; default to empty
        // rather than dropping the node and shifting the pairing.
        let odds = document
            .select(&button_sel)
            .map(|el| el.value().attr("title").unwrap_or("").to_string())
            .collect();
        (teams, odds)
    }
}
