use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use crate::dataset::VacancyStream;
use crate::error::{Result, VacancyError};
use crate::models::Vacancy;
use crate::translator::Translator;

/// Cities below this share of all vacancies are left out of city tables
pub const SHARE_THRESHOLD: f64 = 0.01;

/// City tables are cut to this many entries
pub const TOP_CITIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySalary {
    pub area_name: String,
    pub salary: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityShare {
    pub area_name: String,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCount {
    pub area_name: String,
    pub count: usize,
}

/// Aggregated salary and volume statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub profession: String,
    pub salary_by_year: BTreeMap<i32, i64>,
    pub count_by_year: BTreeMap<i32, usize>,
    pub profession_salary_by_year: BTreeMap<i32, i64>,
    pub profession_count_by_year: BTreeMap<i32, usize>,
    /// Mean salary per city, highest first
    pub salary_by_city: Vec<CitySalary>,
    /// Share of all vacancies per city, largest first
    pub share_by_city: Vec<CityShare>,
    /// Vacancies matching the profession per city, in share order
    pub profession_count_by_city: Vec<CityCount>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    salary_sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, salary: f64) {
        self.salary_sum += salary;
        self.count += 1;
    }

    /// Mean salary truncated toward zero
    fn mean(&self) -> i64 {
        if self.count == 0 {
            0
        } else {
            (self.salary_sum / self.count as f64).trunc() as i64
        }
    }
}

#[derive(Debug)]
struct CityAccumulator {
    area_name: String,
    all: Accumulator,
    profession_count: usize,
}

/// Single-pass accumulation of yearly and per-city figures
#[derive(Debug)]
pub struct StatsAggregator<'a> {
    translator: &'a Translator,
    profession: String,
    years: BTreeMap<i32, Accumulator>,
    profession_years: BTreeMap<i32, Accumulator>,
    // first-seen order decides ties in the share table
    cities: Vec<CityAccumulator>,
    city_index: HashMap<String, usize>,
    total: usize,
}

impl<'a> StatsAggregator<'a> {
    /// `profession` is matched as a case-sensitive substring of the
    /// vacancy name; an empty string matches every vacancy
    pub fn new(profession: &str, translator: &'a Translator) -> Self {
        Self {
            translator,
            profession: profession.to_string(),
            years: BTreeMap::new(),
            profession_years: BTreeMap::new(),
            cities: Vec::new(),
            city_index: HashMap::new(),
            total: 0,
        }
    }

    pub fn add(&mut self, vacancy: &Vacancy) -> Result<()> {
        use chrono::Datelike;

        let salary = vacancy.salary().to_rub(self.translator)?;
        let year = vacancy.published_at().year();
        let is_match = vacancy.name().contains(self.profession.as_str());

        self.total += 1;
        self.years.entry(year).or_default().add(salary);
        if is_match {
            self.profession_years.entry(year).or_default().add(salary);
        }

        let idx = match self.city_index.get(vacancy.area_name()) {
            Some(idx) => *idx,
            None => {
                self.cities.push(CityAccumulator {
                    area_name: vacancy.area_name().to_string(),
                    all: Accumulator::default(),
                    profession_count: 0,
                });
                self.city_index
                    .insert(vacancy.area_name().to_string(), self.cities.len() - 1);
                self.cities.len() - 1
            }
        };

        let city = &mut self.cities[idx];
        city.all.add(salary);
        if is_match {
            city.profession_count += 1;
        }

        Ok(())
    }

    /// Reduce the running sums into the final report
    pub fn finish(self) -> Result<StatisticsReport> {
        if self.total == 0 {
            return Err(VacancyError::NoData);
        }

        let salary_by_year = self.years.iter().map(|(y, acc)| (*y, acc.mean())).collect();
        let count_by_year = self.years.iter().map(|(y, acc)| (*y, acc.count)).collect();

        // only years with a match are listed; with no match at all every year reads zero
        let (profession_salary_by_year, profession_count_by_year): (
            BTreeMap<i32, i64>,
            BTreeMap<i32, usize>,
        ) = if self.profession_years.is_empty() {
            (
                self.years.keys().map(|y| (*y, 0)).collect(),
                self.years.keys().map(|y| (*y, 0)).collect(),
            )
        } else {
            (
                self.profession_years.iter().map(|(y, acc)| (*y, acc.mean())).collect(),
                self.profession_years.iter().map(|(y, acc)| (*y, acc.count)).collect(),
            )
        };

        let total = self.total as f64;
        let retained: Vec<&CityAccumulator> = self
            .cities
            .iter()
            .filter(|city| city.all.count as f64 / total >= SHARE_THRESHOLD)
            .collect();

        let mut shares: Vec<(CityShare, usize)> = retained
            .iter()
            .map(|city| {
                let share = CityShare {
                    area_name: city.area_name.clone(),
                    share: round_share(city.all.count as f64 / total),
                };
                (share, city.profession_count)
            })
            .collect();
        shares.sort_by(|(a, _), (b, _)| b.share.total_cmp(&a.share));
        shares.truncate(TOP_CITIES);

        let mut salary_by_city: Vec<CitySalary> = retained
            .iter()
            .map(|city| CitySalary {
                area_name: city.area_name.clone(),
                salary: city.all.mean(),
            })
            .collect();
        salary_by_city.sort_by(|a, b| {
            b.salary
                .cmp(&a.salary)
                .then_with(|| name_len(&b.area_name).cmp(&name_len(&a.area_name)))
        });
        salary_by_city.truncate(TOP_CITIES);

        let profession_count_by_city = shares
            .iter()
            .map(|(share, count)| CityCount {
                area_name: share.area_name.clone(),
                count: *count,
            })
            .collect();
        let share_by_city = shares.into_iter().map(|(share, _)| share).collect();

        tracing::info!(
            vacancies = self.total,
            cities = self.cities.len(),
            retained = retained.len(),
            "aggregated statistics"
        );

        Ok(StatisticsReport {
            profession: self.profession.clone(),
            salary_by_year,
            count_by_year,
            profession_salary_by_year,
            profession_count_by_year,
            salary_by_city,
            share_by_city,
            profession_count_by_city,
        })
    }
}

/// Aggregate materialized vacancies
pub fn collect_statistics(
    vacancies: &[Vacancy],
    profession: &str,
    translator: &Translator,
) -> Result<StatisticsReport> {
    let mut aggregator = StatsAggregator::new(profession, translator);
    for vacancy in vacancies {
        aggregator.add(vacancy)?;
    }
    aggregator.finish()
}

/// Read the whole stream, then aggregate it
pub fn run_statistics<R: Read>(
    stream: VacancyStream<'_, R>,
    profession: &str,
    translator: &Translator,
) -> Result<StatisticsReport> {
    let vacancies = stream.collect_vacancies()?;
    collect_statistics(&vacancies, profession, translator)
}

fn round_share(share: f64) -> f64 {
    (share * 10_000.0).round() / 10_000.0
}

fn name_len(name: &str) -> usize {
    name.chars().count()
}
