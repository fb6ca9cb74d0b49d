use thiserror::Error;

/// Fatal conditions that abort a table query or a statistics report.
///
/// The `Display` text of each variant is the localized message shown to
/// the user, so the CLI can print an error verbatim.
#[derive(Debug, Error)]
pub enum VacancyError {
    #[error("Пустой файл")]
    EmptyInput,

    #[error("Нет данных")]
    NoData,

    #[error("Формат ввода некорректен")]
    MalformedFilterSyntax { input: String },

    #[error("Параметр поиска некорректен")]
    UnknownFilterField { field: String },

    #[error("Параметр поиска некорректен")]
    InvalidFilterValue { field: String, value: String },

    #[error("Параметр сортировки некорректен")]
    UnknownSortField { field: String },

    #[error("Порядок сортировки задан некорректно")]
    InvalidSortDirection { value: String },

    #[error("Ничего не найдено")]
    EmptyResult,

    #[error("Формат ввода некорректен")]
    InvalidRange { input: String },

    #[error("Параметр вывода некорректен")]
    InvalidColumns { column: String },

    #[error("Неподдерживаемая структура файла")]
    UnsupportedSchema { reason: String },

    #[error("Неизвестная валюта: {code}")]
    UnknownCurrency { code: String },

    #[error("Ошибка чтения файла: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка разбора CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ошибка загрузки таблиц перевода: {0}")]
    Tables(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VacancyError>;
