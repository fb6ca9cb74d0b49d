//! End-to-end tests: CSV file on disk through query and statistics.

use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;
use vacstat_core::*;

const FULL_HEADER: &str = "name,description,key_skills,experience_id,premium,employer_name,salary_from,salary_to,salary_gross,salary_currency,area_name,published_at";
const CONDENSED_HEADER: &str = "name,salary_from,salary_to,salary_currency,area_name,published_at";

/// Helper to write a CSV fixture into a temporary directory.
fn write_csv(lines: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("vacancies.csv");
    std::fs::write(&path, lines.join("\n")).expect("write csv");
    (temp_dir, path)
}

fn query(params: QueryParams, path: &PathBuf, translator: &Translator) -> Result<QueryTable> {
    let stream = open_dataset(path, translator)?;
    let query = Query::parse(&params, stream.schema(), translator)?;
    run_query(stream, &query, translator)
}

fn full_fixture() -> Vec<&'static str> {
    vec![
        FULL_HEADER,
        "Rust developer,<p>Build services</p>,\"Rust\nSQL\",between1And3,False,Acme,100000,150000,True,RUR,Москва,2022-07-05T18:19:30+0300",
        "Go developer,Write Go,\"Go\nSQL\",noExperience,True,Globex,1000,2000,False,USD,Санкт-Петербург,2022-07-06T09:00:00+0300",
        "Analyst,Count things,Excel,moreThan6,False,Initech,50000,70000,False,RUR,Москва,2021-02-01T12:00:00+0300",
        "Broken row,,Excel,moreThan6,False,Initech,50000,70000,False,RUR,Москва,2021-02-01T12:00:00+0300",
    ]
}

#[test]
fn test_condensed_query_example() {
    let (_dir, path) = write_csv(&[
        CONDENSED_HEADER,
        "\"A\",\"1000\",\"2000\",\"RUR\",\"Moscow\",\"2022-01-01T00:00:00+0300\"",
    ]);
    let translator = Translator::default();

    let table = query(QueryParams::default(), &path, &translator).unwrap();
    assert_eq!(
        table.headers,
        vec!["№", "Название", "Оклад", "Название региона", "Дата публикации вакансии"]
    );
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].number, 1);
    assert_eq!(
        table.rows[0].cells,
        vec!["A", "1 000 - 2 000 (Рубли)", "Moscow", "01.01.2022"]
    );
}

#[test]
fn test_full_query_filter_sort_and_columns() {
    let (_dir, path) = write_csv(&full_fixture());
    let translator = Translator::default();

    let params = QueryParams {
        filter: "Навыки: SQL".into(),
        sort_field: "Оклад".into(),
        reverse: "Да".into(),
        columns: "Название, Оклад".into(),
        ..Default::default()
    };
    let table = query(params, &path, &translator).unwrap();

    assert_eq!(table.headers, vec!["№", "Название", "Оклад"]);
    assert_eq!(table.matched, 2);
    // 1500 USD midpoint is about 91 000 RUB, below the 125 000 RUB midpoint
    assert_eq!(table.rows[0].cells[0], "Rust developer");
    assert_eq!(
        table.rows[0].cells[1],
        "100 000 - 150 000 (Рубли) (Без вычета налогов)"
    );
    assert_eq!(table.rows[1].cells[0], "Go developer");
    assert_eq!(
        table.rows[1].cells[1],
        "1 000 - 2 000 (Доллары) (С вычетом налогов)"
    );
}

#[test]
fn test_full_query_range() {
    let (_dir, path) = write_csv(&full_fixture());
    let translator = Translator::default();

    let params = QueryParams {
        range: "2 3".into(),
        columns: "Название".into(),
        ..Default::default()
    };
    let table = query(params, &path, &translator).unwrap();

    let numbers: Vec<usize> = table.rows.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![2, 3]);
    assert_eq!(table.rows[1].cells, vec!["Analyst"]);
}

#[test]
fn test_query_errors() {
    let (_dir, path) = write_csv(&full_fixture());
    let translator = Translator::default();

    let nothing = QueryParams {
        filter: "Название: Nobody".into(),
        ..Default::default()
    };
    assert!(matches!(
        query(nothing, &path, &translator),
        Err(VacancyError::EmptyResult)
    ));

    let bad_sort = QueryParams {
        sort_field: "Город".into(),
        ..Default::default()
    };
    let err = query(bad_sort, &path, &translator).unwrap_err();
    assert_eq!(err.to_string(), "Параметр сортировки некорректен");

    let bad_direction = QueryParams {
        reverse: "Наоборот".into(),
        ..Default::default()
    };
    let err = query(bad_direction, &path, &translator).unwrap_err();
    assert_eq!(err.to_string(), "Порядок сортировки задан некорректно");
}

#[test]
fn test_empty_and_rejected_files() {
    let translator = Translator::default();

    let (_dir, header_only) = write_csv(&[CONDENSED_HEADER]);
    let err = query(QueryParams::default(), &header_only, &translator).unwrap_err();
    assert_eq!(err.to_string(), "Пустой файл");

    let (_dir2, blank) = write_csv(&[]);
    assert!(matches!(
        open_dataset(&blank, &translator),
        Err(VacancyError::EmptyInput)
    ));

    let (_dir3, rejected) = write_csv(&[CONDENSED_HEADER, "A,,2000,RUR,Moscow,2022-01-01T00:00:00+0300"]);
    let stream = open_dataset(&rejected, &translator).unwrap();
    let err = run_statistics(stream, "", &translator).unwrap_err();
    assert_eq!(err.to_string(), "Нет данных");
}

#[test]
fn test_statistics_from_file() {
    let (_dir, path) = write_csv(&[
        CONDENSED_HEADER,
        "Программист,1000,1000,RUR,Moscow,2021-01-01T00:00:00+0300",
        "Программист Rust,1000,3000,RUR,Moscow,2022-01-01T00:00:00+0300",
        "Аналитик,500,500,RUR,Town,2022-06-01T00:00:00+0300",
    ]);
    let translator = Translator::default();

    let stream = open_dataset(&path, &translator).unwrap();
    let report = run_statistics(stream, "Программист", &translator).unwrap();

    assert_eq!(report.salary_by_year, BTreeMap::from([(2021, 1000), (2022, 1250)]));
    assert_eq!(report.count_by_year, BTreeMap::from([(2021, 1), (2022, 2)]));
    assert_eq!(
        report.profession_salary_by_year,
        BTreeMap::from([(2021, 1000), (2022, 2000)])
    );
    assert_eq!(
        report.profession_count_by_year,
        BTreeMap::from([(2021, 1), (2022, 1)])
    );
    assert_eq!(report.share_by_city[0].area_name, "Moscow");
    assert_eq!(report.share_by_city[0].share, 0.6667);
    assert_eq!(report.salary_by_city[0].salary, 1500);
}

#[test]
fn test_unknown_currency_aborts_run() {
    let (_dir, path) = write_csv(&[
        CONDENSED_HEADER,
        "A,1000,2000,RUR,Moscow,2022-01-01T00:00:00+0300",
        "B,1000,2000,BTC,Moscow,2022-01-01T00:00:00+0300",
    ]);
    let translator = Translator::default();

    let stream = open_dataset(&path, &translator).unwrap();
    assert!(matches!(
        run_statistics(stream, "", &translator),
        Err(VacancyError::UnknownCurrency { .. })
    ));
}
