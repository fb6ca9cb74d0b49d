use std::io::ErrorKind;
use vacstat_core::VacancyError;

/// Map a top-level error to the single line shown to the user.
///
/// Core errors carry their own localized message. File system failures
/// get a short explanation, anything else prints its context chain.
pub fn user_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<VacancyError>() {
        Some(VacancyError::Io(io_error)) if io_error.kind() == ErrorKind::NotFound => {
            "Файл не найден".to_string()
        }
        Some(VacancyError::Io(io_error)) if io_error.kind() == ErrorKind::PermissionDenied => {
            "Нет доступа к файлу".to_string()
        }
        Some(vacancy_error) => vacancy_error.to_string(),
        None => format!("{:#}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::io;

    #[test]
    fn test_core_errors_use_their_message() {
        let error = anyhow::Error::new(VacancyError::EmptyResult);
        assert_eq!(user_message(&error), "Ничего не найдено");

        let error = anyhow::Error::new(VacancyError::UnknownCurrency {
            code: "BTC".to_string(),
        });
        assert_eq!(user_message(&error), "Неизвестная валюта: BTC");
    }

    #[test]
    fn test_io_errors_are_explained() {
        let missing = VacancyError::Io(io::Error::new(ErrorKind::NotFound, "gone"));
        assert_eq!(user_message(&anyhow::Error::new(missing)), "Файл не найден");

        let denied = VacancyError::Io(io::Error::new(ErrorKind::PermissionDenied, "no"));
        assert_eq!(user_message(&anyhow::Error::new(denied)), "Нет доступа к файлу");
    }

    #[test]
    fn test_context_does_not_hide_core_error() {
        let result: Result<(), VacancyError> = Err(VacancyError::NoData);
        let error = result.context("reading vacancies.csv").unwrap_err();
        assert_eq!(user_message(&error), "Нет данных");
    }

    #[test]
    fn test_other_errors_print_chain() {
        let error = anyhow::anyhow!("inner").context("outer");
        assert_eq!(user_message(&error), "outer: inner");
    }
}
