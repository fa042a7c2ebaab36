//! Сводные запросы по загруженным записям.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{Hand, Player};

/// Итоги по одной стране.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary<'a> {
    pub country: &'a str,
    pub players: Vec<&'a Player>,
    pub total_points: i64,
}

/// Итоги по ведущей руке.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSummary {
    pub hand: Hand,
    pub players: usize,
    pub average_points: f64,
}

#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub home_country: String,
    /// По убыванию очков.
    pub ranking: Vec<&'a Player>,
    pub average_height: f64,
    pub average_weight: f64,
    pub tallest: Option<&'a Player>,
    pub from_home: Vec<&'a Player>,
    /// По убыванию суммы очков.
    pub countries: Vec<CountrySummary<'a>>,
    pub hands: Vec<HandSummary>,
    pub best_from_home: Option<&'a Player>,
}

impl<'a> Report<'a> {
    pub fn build(players: &'a [Player], home_country: &str) -> Self {
        let mut ranking: Vec<&Player> = players.iter().collect();
        ranking.sort_by(|a, b| b.points.cmp(&a.points));

        let is_home = |p: &Player| p.country.to_lowercase() == home_country.to_lowercase();
        let from_home: Vec<&Player> = players.iter().filter(|p| is_home(p)).collect();
        let best_from_home = first_max_by(from_home.iter().copied(), |p| p.points);

        Self {
            home_country: home_country.to_string(),
            ranking,
            average_height: average(players.iter().map(|p| p.height)),
            average_weight: average(players.iter().map(|p| p.weight)),
            tallest: first_max_by(players.iter(), |p| p.height),
            from_home,
            countries: countries(players),
            hands: hands(players),
            best_from_home,
        }
    }

    /// Страна с наибольшей суммой очков.
    pub fn top_country(&self) -> Option<&CountrySummary<'a>> {
        self.countries.first()
    }
}

/// Максимум по ключу; при равенстве остаётся первый по порядку.
fn first_max_by<'a>(
    players: impl Iterator<Item = &'a Player>,
    key: impl Fn(&Player) -> i32,
) -> Option<&'a Player> {
    players.reduce(|best, p| if key(p) > key(best) { p } else { best })
}

fn average(values: impl Iterator<Item = i32>) -> f64 {
    let (sum, count) = values.fold((0i64, 0usize), |(s, c), v| (s + i64::from(v), c + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

fn countries(players: &[Player]) -> Vec<CountrySummary<'_>> {
    let mut grouped: BTreeMap<&str, Vec<&Player>> = BTreeMap::new();
    for p in players {
        grouped.entry(p.country.as_str()).or_default().push(p);
    }
    let mut summaries: Vec<CountrySummary> = grouped
        .into_iter()
        .map(|(country, players)| CountrySummary {
            country,
            total_points: players.iter().map(|p| i64::from(p.points)).sum(),
            players,
        })
        .collect();
    summaries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    summaries
}

fn hands(players: &[Player]) -> Vec<HandSummary> {
    [Hand::Right, Hand::Left]
        .into_iter()
        .filter_map(|hand| {
            let count = players.iter().filter(|p| p.hand == hand).count();
            (count > 0).then(|| HandSummary {
                hand,
                players: count,
                average_points: average(players.iter().filter(|p| p.hand == hand).map(|p| p.points)),
            })
        })
        .collect()
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "СВОДКА ПО ТЕННИСИСТАМ")?;
        writeln!(f, "{rule}")?;

        writeln!(f, "\nРейтинг (по очкам):")?;
        for p in &self.ranking {
            writeln!(f, "   {} - {} очков", p.name, p.points)?;
        }

        writeln!(f, "\nСредний рост: {:.2} см", self.average_height)?;
        writeln!(f, "Средний вес: {:.2} кг", self.average_weight)?;
        match self.tallest {
            Some(p) => writeln!(f, "Самый высокий: {} ({} см)", p.name, p.height)?,
            None => writeln!(f, "Самый высокий: N/A")?,
        }

        writeln!(f, "\nТеннисисты из страны {}:", self.home_country)?;
        for p in &self.from_home {
            writeln!(f, "   {}", p.name)?;
        }

        writeln!(f, "\nПо странам:")?;
        for c in &self.countries {
            writeln!(f, "   {}:", c.country)?;
            for p in &c.players {
                writeln!(f, "     - {}", p.name)?;
            }
        }

        writeln!(f, "\nКоличество по странам (по сумме очков):")?;
        for c in &self.countries {
            writeln!(
                f,
                "   {}: {} теннисистов ({} очков всего)",
                c.country,
                c.players.len(),
                c.total_points
            )?;
        }

        writeln!(f, "\nПо ведущей руке:")?;
        for h in &self.hands {
            writeln!(
                f,
                "   {}: {} теннисистов ({:.2} очков в среднем)",
                h.hand, h.players, h.average_points
            )?;
        }

        writeln!(f, "\nСумма очков по странам:")?;
        for c in &self.countries {
            writeln!(f, "   {}: {} очков", c.country, c.total_points)?;
        }

        match self.top_country() {
            Some(c) => writeln!(f, "\nСтрана с наибольшей суммой очков: {} ({} очков)", c.country, c.total_points)?,
            None => writeln!(f, "\nСтрана с наибольшей суммой очков: N/A")?,
        }
        match self.best_from_home {
            Some(p) => writeln!(f, "Лучший теннисист страны {}: {} ({} очков)", self.home_country, p.name, p.points)?,
            None => writeln!(f, "Лучший теннисист страны {}: N/A", self.home_country)?,
        }
        write!(f, "{rule}")
    }
}
