use chrono::NaiveDate;
use deunicode::deunicode;

/// Canonical release date layout carried on every record
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts a site label into a lowercase, dash-separated slug
///
/// Non-ASCII text is transliterated first (`é` becomes `e`). Runs of
/// anything other than ASCII letters, digits and underscores then collapse
/// into a single `-`; leading and trailing dashes are dropped.
///
/// # Examples
///
/// ```
/// use scene_scraper::model::slugify;
///
/// assert_eq!(slugify("Randy's Road Stop"), "randy-s-road-stop");
/// assert_eq!(slugify("  VRClubz  "), "vrclubz");
/// assert_eq!(slugify("Café Übung VR"), "cafe-ubung-vr");
/// ```
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Builds the internal scene id `<slug(site)>-<site-local id>`
///
/// The result is deterministic so it can be used as a de-duplication key
/// across runs.
pub fn scene_id(site: &str, site_local_id: &str) -> String {
    format!("{}-{}", slugify(site), site_local_id.trim())
}

/// Parses a site-specific date string and renders it as `YYYY-MM-DD`
///
/// `format` uses chrono's strftime syntax. Unparseable input yields an empty
/// string, the zero value of the `released` field.
///
/// # Examples
///
/// ```
/// use scene_scraper::model::normalize_release_date;
///
/// assert_eq!(normalize_release_date("March 07, 2021", "%B %d, %Y"), "2021-03-07");
/// assert_eq!(normalize_release_date("not a date", "%B %d, %Y"), "");
/// ```
pub fn normalize_release_date(raw: &str, format: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), format)
        .map(|date| date.format(RELEASE_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
