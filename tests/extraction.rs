//! Extraction tests against fixture markup shaped like each site's rendered
//! output.

use oddswatch::alias;
use oddswatch::extract::extract;
use oddswatch::sites::betfair::BetfairOdds;
use oddswatch::sites::paddypower::PaddyPowerOdds;
use oddswatch::sites::SiteOdds;

/// Two coupon cards: the first holds unrelated content and must be skipped
/// by position, the second holds the winner market.
const PADDYPOWER_FIXTURE: &str = r#"<html><body>
<div class="outright-coupon-card">
  <div class="outright-item">
    <span class="outright-item__name">Top Goalscorer</span>
    <span class="outright-item__odds">4/1</span>
  </div>
</div>
<div class="outright-coupon-card">
  <div class="outright-item">
    <span class="outright-item__name">Spain</span>
    <span class="outright-item__odds">15/2</span>
  </div>
  <div class="outright-item">
    <span class="outright-item__name">Rep Of Ireland</span>
    <span class="outright-item__odds">66/1</span>
  </div>
  <div class="outright-item">
    <span class="outright-item__name">Iceland</span>
    <span class="outright-item__odds">500/1</span>
  </div>
</div>
</body></html>"#;

const BETFAIR_FIXTURE: &str = r#"<html><body>
<h3 class="runner-name">England</h3>
<button class="lay mv-bet-button lay-button lay-selection-button" title="11/2">6.4</button>
<h3 class="runner-name">Spain</h3>
<button class="lay mv-bet-button lay-button lay-selection-button" title="17/2">9.4</button>
<h3 class="runner-name">Wales</h3>
<button class="lay mv-bet-button lay-button lay-selection-button">-</button>
<button class="back mv-bet-button back-button" title="ignored">1.01</button>
</body></html>"#;

#[test]
fn paddypower_extracts_second_card_only() {
    let result = extract(&PaddyPowerOdds, PADDYPOWER_FIXTURE).unwrap();

    assert_eq!(result.teams.len(), result.odds.len());
    assert_eq!(result.teams.len(), 3);
    assert!(!result.teams.contains(&"Top Goalscorer".to_string()));

    let spain = result.teams.iter().position(|t| t == "Spain").unwrap();
    assert_eq!(result.odds[spain], "15/2");
    let iceland = result.teams.iter().position(|t| t == "Iceland").unwrap();
    assert_eq!(result.odds[iceland], "500/1");
}

#[test]
fn paddypower_applies_alias_normalization() {
    let result = extract(&PaddyPowerOdds, PADDYPOWER_FIXTURE).unwrap();

    let ireland = result
        .teams
        .iter()
        .position(|t| t == "Republic of Ireland")
        .unwrap();
    assert_eq!(result.odds[ireland], "66/1");
    assert!(!result.teams.contains(&"Rep Of Ireland".to_string()));
}

#[test]
fn paddypower_missing_card_yields_empty_result() {
    let result = extract(&PaddyPowerOdds, "<html><body><p>maintenance</p></body></html>").unwrap();
    assert!(result.is_empty());

    // A single card is not enough: the winner market is always the second.
    let one_card = r#"<div class="outright-coupon-card">
        <span class="outright-item__name">Spain</span>
        <span class="outright-item__odds">15/2</span></div>"#;
    assert!(extract(&PaddyPowerOdds, one_card).unwrap().is_empty());
}

#[test]
fn betfair_pairs_runner_names_with_lay_button_titles() {
    let result = extract(&BetfairOdds, BETFAIR_FIXTURE).unwrap();

    assert_eq!(result.teams.len(), result.odds.len());
    assert_eq!(result.teams.len(), 3);

    let england = result.teams.iter().position(|t| t == "England").unwrap();
    assert_eq!(result.odds[england], "11/2");
    let spain = result.teams.iter().position(|t| t == "Spain").unwrap();
    assert_eq!(result.odds[spain], "17/2");
}

#[test]
fn betfair_untitled_button_defaults_to_empty_cell() {
    let result = extract(&BetfairOdds, BETFAIR_FIXTURE).unwrap();
    let wales = result.teams.iter().position(|t| t == "Wales").unwrap();
    assert_eq!(result.odds[wales], "");
}

#[test]
fn betfair_ignores_back_side_buttons() {
    let (_, odds) = BetfairOdds.transform(BETFAIR_FIXTURE);
    assert!(!odds.contains(&"ignored".to_string()));
}

#[test]
fn alias_pass_is_idempotent() {
    let result = extract(&PaddyPowerOdds, PADDYPOWER_FIXTURE).unwrap();
    let twice: Vec<String> = result.teams.iter().map(|t| alias::canonical(t)).collect();
    assert_eq!(twice, result.teams);
}
