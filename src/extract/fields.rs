//! Detail-page field extractors

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::date::parse_release;
use super::text::fragment_text;
use crate::record::Title;

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("extraction pattern must compile")
}

static PAGE_TITLE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?is)<title>(.+?)</title>"));
static BRANDING: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\s*\(\d+\)\s*-\s*AlloCiné\s*$"));
static ORIGINAL_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"(?s)Titre original : <span class="purehtml"><em>(.+?)</em></span>"#)
});
static RELEASE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?s)Date de sortie cinéma :(.+?)<br />"));
static RUNTIME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?s)Durée :.*?(\d+)h\s*(\d+)\s*min"));
static BUDGET: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?s)<b>Budget</b> : (.+?) \$</h4>"));
static SCORE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"(?s)Presse.+?<span class="moreinfo">\((\d+(?:,\d+)?)\)</span>"#)
});
static POPULARITY: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"(?s)Spectateurs.+?<span class="moreinfo">\((\d+(?:,\d+)?)\)</span>"#)
});
static OVERVIEW: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"(?s)<p><span class="bold">Synopsis : </span>(.+?)</p>"#)
});
static DIRECTORS: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r#"(?s)Réalisé par <span class="bold"><a href='/personne/fichepersonne_gen_cpersonne=\d+\.html' title='.+?'>.+?</span>"#,
    )
});
static ACTORS: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"(?s)Avec.+?<a class="underline" href="/film/casting_gen_cfilm=\d+\.html">plus</a>"#)
});
static PERSON_LINK: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?s)<a href='/personne/fichepersonne_gen_cpersonne=(\d+)\.html' title='(.+?)'>")
});
static GENRE_LINK: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?s)<a href='/film/tous/genre-([^/']+)/' >(.+?)</a>"));

/// A person link found inside a credits region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    /// Person identifier on the site
    pub id: String,
    pub name: String,
}

/// A genre link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    /// Genre identifier used in listing URLs
    pub slug: String,
    pub name: String,
}

/// First capture group of `regex` in `page`
fn capture<'p>(regex: &Regex, page: &'p str) -> Option<&'p str> {
    regex
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Page `<title>` without the site branding suffix
pub fn extract_alternative_title(page: &str) -> Option<Title> {
    let raw = fragment_text(capture(&PAGE_TITLE, page)?)?;
    let stripped = BRANDING.replace(&raw, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        None
    } else {
        Some(Title::new(stripped))
    }
}

/// Original title, falling back to the page title
pub fn extract_title(page: &str) -> Option<Title> {
    capture(&ORIGINAL_TITLE, page)
        .and_then(fragment_text)
        .map(Title::new)
        .or_else(|| extract_alternative_title(page))
}

pub fn extract_release(page: &str) -> Option<NaiveDate> {
    let text = fragment_text(capture(&RELEASE, page)?)?;
    parse_release(&text)
}

/// Runtime in minutes from `Durée : 1h35 min`
pub fn extract_runtime(page: &str) -> Option<u32> {
    let caps = RUNTIME.captures(page)?;
    let hours: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u32 = caps.get(2)?.as_str().parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Budget digits with separators removed
pub fn extract_budget(page: &str) -> Option<String> {
    let text = fragment_text(capture(&BUDGET, page)?)?;
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Some(digits)
}

/// Press rating
pub fn extract_score(page: &str) -> Option<String> {
    capture(&SCORE, page).map(decimal)
}

/// Audience rating
pub fn extract_popularity(page: &str) -> Option<String> {
    capture(&POPULARITY, page).map(decimal)
}

fn decimal(text: &str) -> String {
    text.replace(',', ".")
}

pub fn extract_short_overview(page: &str) -> Option<String> {
    fragment_text(capture(&OVERVIEW, page)?)
}

pub fn extract_directors(page: &str) -> Vec<Credit> {
    credits_in(&DIRECTORS, page)
}

pub fn extract_actors(page: &str) -> Vec<Credit> {
    credits_in(&ACTORS, page)
}

/// Person links inside the first region matched by `region`
fn credits_in(region: &Regex, page: &str) -> Vec<Credit> {
    let Some(region) = region.find(page) else {
        return Vec::new();
    };

    PERSON_LINK
        .captures_iter(region.as_str())
        .filter_map(|caps| {
            let id = caps.get(1)?.as_str().to_string();
            let name = fragment_text(caps.get(2)?.as_str())?;
            Some(Credit { id, name })
        })
        .collect()
}

pub fn extract_categories(page: &str) -> Vec<Genre> {
    GENRE_LINK
        .captures_iter(page)
        .filter_map(|caps| {
            let slug = caps.get(1)?.as_str().to_string();
            let name = fragment_text(caps.get(2)?.as_str())?;
            Some(Genre { slug, name })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"<html><head>
<title>La Haine (1995) - AlloCiné</title>
</head><body>
<h3>Titre original : <span class="purehtml"><em>La Haine</em></span></h3>
Date de sortie cinéma : <a href="/film/agenda.html?week=1995-05-31">31 mai 1995</a><br />
Réalisé par <span class="bold"><a href='/personne/fichepersonne_gen_cpersonne=1877.html' title='Mathieu Kassovitz'>Mathieu Kassovitz</a></span>
Avec <a href='/personne/fichepersonne_gen_cpersonne=1925.html' title='Vincent Cassel'>Vincent Cassel</a>, <a href='/personne/fichepersonne_gen_cpersonne=8461.html' title='Hubert Kound&eacute;'>Hubert Koundé</a>, <a class="underline" href="/film/casting_gen_cfilm=11736.html">plus</a>
Genre : <a href='/film/tous/genre-13008/' >Drame</a>, <a href='/film/tous/genre-13025/' >Policier</a>
Durée : 1h35 min
<h4><b>Budget</b> : 2 600 000 $</h4>
Presse <img src='/etoile.gif' /> <span class="moreinfo">(3,8)</span>
Spectateurs <img src='/etoile.gif' /> <span class="moreinfo">(4,3)</span>
<p><span class="bold">Synopsis : </span>Trois amis de <b>banlieue</b> passent
une journée après une émeute.</p>
</body></html>"#;

    #[test]
    fn test_titles() {
        let alternative = extract_alternative_title(DETAIL).unwrap();
        assert_eq!(alternative.display, "La Haine");
        assert_eq!(alternative.lower, "la haine");

        let title = extract_title(DETAIL).unwrap();
        assert_eq!(title.display, "La Haine");
    }

    #[test]
    fn test_title_falls_back_to_page_title() {
        let page = "<title>Fight Club (1999) - AlloCin&eacute;</title>";
        let title = extract_title(page).unwrap();
        assert_eq!(title.display, "Fight Club");
        assert_eq!(title.lower, "fight club");
    }

    #[test]
    fn test_original_title_preferred() {
        let page = r#"<title>Le Voyage de Chihiro (2001) - AlloCiné</title>
Titre original : <span class="purehtml"><em>Sen to Chihiro no kamikakushi</em></span>"#;
        assert_eq!(
            extract_title(page).unwrap().display,
            "Sen to Chihiro no kamikakushi"
        );
        assert_eq!(
            extract_alternative_title(page).unwrap().display,
            "Le Voyage de Chihiro"
        );
    }

    #[test]
    fn test_release_runtime_budget() {
        assert_eq!(extract_release(DETAIL), NaiveDate::from_ymd_opt(1995, 5, 31));
        assert_eq!(extract_runtime(DETAIL), Some(95));
        assert_eq!(extract_budget(DETAIL).as_deref(), Some("2600000"));
    }

    #[test]
    fn test_ratings_use_dot_decimal() {
        assert_eq!(extract_score(DETAIL).as_deref(), Some("3.8"));
        assert_eq!(extract_popularity(DETAIL).as_deref(), Some("4.3"));
    }

    #[test]
    fn test_overview() {
        assert_eq!(
            extract_short_overview(DETAIL).as_deref(),
            Some("Trois amis de banlieue passent une journée après une émeute.")
        );
    }

    #[test]
    fn test_people_in_page_order() {
        let directors = extract_directors(DETAIL);
        assert_eq!(
            directors,
            vec![Credit {
                id: "1877".to_string(),
                name: "Mathieu Kassovitz".to_string()
            }]
        );

        let actors = extract_actors(DETAIL);
        let names: Vec<_> = actors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Vincent Cassel", "Hubert Koundé"]);
        assert_eq!(actors[1].id, "8461");
    }

    #[test]
    fn test_categories() {
        let genres = extract_categories(DETAIL);
        assert_eq!(
            genres,
            vec![
                Genre {
                    slug: "13008".to_string(),
                    name: "Drame".to_string()
                },
                Genre {
                    slug: "13025".to_string(),
                    name: "Policier".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_missing_markup_is_absent() {
        let page = "<html><body>Rien ici</body></html>";
        assert_eq!(extract_title(page), None);
        assert_eq!(extract_alternative_title(page), None);
        assert_eq!(extract_release(page), None);
        assert_eq!(extract_runtime(page), None);
        assert_eq!(extract_budget(page), None);
        assert_eq!(extract_score(page), None);
        assert_eq!(extract_popularity(page), None);
        assert_eq!(extract_short_overview(page), None);
        assert!(extract_directors(page).is_empty());
        assert!(extract_actors(page).is_empty());
        assert!(extract_categories(page).is_empty());
    }

    #[test]
    fn test_unparseable_release_is_absent() {
        let page = "Date de sortie cinéma : prochainement<br />";
        assert_eq!(extract_release(page), None);
    }

    #[test]
    fn test_actor_links_outside_region_ignored() {
        let page = r#"<a href='/personne/fichepersonne_gen_cpersonne=1.html' title='Ailleurs'>
Avec <a href='/personne/fichepersonne_gen_cpersonne=2.html' title='Dedans'>Dedans</a>
<a class="underline" href="/film/casting_gen_cfilm=9.html">plus</a>"#;
        let actors = extract_actors(page);
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Dedans");
    }
}
