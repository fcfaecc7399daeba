use crate::domain::model::{Answers, City, Country, Recommendation};

pub const FALLBACK_SCORE: u8 = 75;

const COSTA_RICA_CITIES: [(&str, &str); 3] = [
    ("San José", "Capital with the best hospitals, services and the main international airport"),
    ("Atenas", "Mild year-round climate and a settled expat community"),
    ("Tamarindo", "Pacific beach town with plenty of English-speaking services"),
];

const PANAMA_CITIES: [(&str, &str); 3] = [
    ("Panama City", "Regional business hub with modern infrastructure"),
    ("Boquete", "Cool highland climate popular with retirees"),
    ("Coronado", "Beach living within an hour of the capital"),
];

const BELIZE_CITIES: [(&str, &str); 3] = [
    ("Belize City", "Main commercial centre and transport hub"),
    ("San Pedro", "Island life on Ambergris Caye"),
    ("San Ignacio", "Inland base close to jungle and Mayan sites"),
];

pub fn city_table(country: Country) -> &'static [(&'static str, &'static str); 3] {
    match country {
        Country::CostaRica => &COSTA_RICA_CITIES,
        Country::Panama => &PANAMA_CITIES,
        Country::Belize => &BELIZE_CITIES,
    }
}

/// 覆寫鏈：panama 先於 belize（與清單順序無關），再看 relocationType 是否含 "work"
pub fn pick_country(answers: &Answers) -> Country {
    let destinations: Vec<String> = answers
        .destinations()
        .iter()
        .map(|d| d.trim().to_lowercase())
        .collect();

    if destinations.iter().any(|d| d == "panama") {
        Country::Panama
    } else if destinations.iter().any(|d| d == "belize") {
        Country::Belize
    } else if answers
        .relocation_type()
        .map(|t| t.to_lowercase().contains("work"))
        .unwrap_or(false)
    {
        Country::Panama
    } else {
        Country::CostaRica
    }
}

pub fn recommend(answers: &Answers) -> Recommendation {
    let country = pick_country(answers);
    tracing::debug!("Fallback picked {}", country);

    Recommendation {
        country,
        score: FALLBACK_SCORE,
        reasons: vec![
            format!("{} fits the priorities in your answers", country),
            format!("{} has established communities of people who relocated from abroad", country),
        ],
        cities: city_table(country)
            .iter()
            .map(|(name, reason)| City {
                name: name.to_string(),
                reason: reason.to_string(),
            })
            .collect(),
    }
}
