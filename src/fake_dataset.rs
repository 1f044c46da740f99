use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::attributes::Attribute;
use crate::dataset::{Dataset, DatasetSource, Gender, PlayerRecord};

const NATIONS: &[&str] = &[
    "Morocco",
    "Egypt",
    "Algeria",
    "Tunisia",
    "Senegal",
    "Nigeria",
    "Ghana",
    "Cameroon",
    "Côte d'Ivoire",
    "Mali",
    "England",
    "France",
    "Spain",
    "Germany",
    "Brazil",
    "Argentina",
    "United States",
    "Japan",
    "Netherlands",
    "Portugal",
];

const MEN_TEAMS: &[&str] = &[
    "Arsenal",
    "Liverpool",
    "Real Madrid",
    "FC Barcelona",
    "FC Bayern München",
    "Leverkusen",
    "Paris SG",
    "OM",
    "Inter Miami CF",
    "LAFC",
    "Al Hilal",
    "Galatasaray SK",
];

const WOMEN_TEAMS: &[&str] = &[
    "Arsenal",
    "Chelsea",
    "FC Barcelona",
    "Real Madrid CF",
    "VfL Wolfsburg",
    "FC Bayern München",
    "OL",
    "Paris FC",
    "Portland Thorns",
    "San Diego Wave",
    "Kansas City",
];

const POSITIONS: &[&str] = &["GK", "CB", "LB", "RB", "CDM", "CM", "CAM", "LW", "RW", "ST"];

// Roughly one rating in forty is left blank, like the real export.
const NULL_RATE: f64 = 0.025;

/// Deterministic stand-in for the ratings file, used for demos and benchmarks.
pub fn generate(players: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(players);

    for idx in 0..players {
        let gender = if rng.gen_bool(0.7) {
            Gender::Men
        } else {
            Gender::Women
        };
        let team = match gender {
            Gender::Men => pick(&mut rng, MEN_TEAMS),
            Gender::Women => pick(&mut rng, WOMEN_TEAMS),
        };
        let position = pick(&mut rng, POSITIONS);
        let birth_date = if rng.gen_bool(0.98) {
            random_birth_date(&mut rng)
        } else {
            None
        };

        let mut player = PlayerRecord::new(
            format!("Player {}", idx + 1),
            pick(&mut rng, NATIONS),
            team,
            Some(gender),
            birth_date,
            position,
        );
        let keeper = position == "GK";
        for attr in Attribute::ALL {
            if rng.gen_bool(NULL_RATE) {
                continue;
            }
            let (lo, hi) = match (attr.is_goalkeeping(), keeper) {
                (true, true) | (false, false) => (55.0, 92.0),
                _ => (8.0, 35.0),
            };
            let value: f64 = rng.gen_range(lo..hi);
            player.set_attribute(attr, Some(value.round()));
        }
        out.push(player);
    }

    Dataset::with_source(out, DatasetSource::Synthetic { seed, players })
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn random_birth_date(rng: &mut StdRng) -> Option<NaiveDate> {
    let year = rng.gen_range(1981..=2007);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
}
