//! Team-name alias normalization.
//!
//! Different bookmakers label the same national team differently. The table
//! below maps every known raw spelling to its canonical form. It is fixed,
//! immutable, and applied unconditionally to every extracted name.

/// Raw spelling → canonical name. No canonical name appears as a key, so
/// applying the table twice is the same as applying it once.
const ALIASES: &[(&str, &str)] = &[
    ("Rep Of Ireland", "Republic of Ireland"),
    ("Rep of Ireland", "Republic of Ireland"),
    ("Ireland", "Republic of Ireland"),
    ("Nth Macedonia", "North Macedonia"),
    ("N Macedonia", "North Macedonia"),
    ("Bosnia-Herzegovina", "Bosnia & Herzegovina"),
    ("Bosnia Herzegovina", "Bosnia & Herzegovina"),
    ("USA", "United States"),
    ("Holland", "Netherlands"),
];

/// Normalize one team name, returning it unchanged if no alias matches.
pub fn canonical(name: &str) -> String {
    for (raw, fixed) in ALIASES {
        if *raw == name {
            return (*fixed).to_string();
        }
    }
    name.to_string()
}
