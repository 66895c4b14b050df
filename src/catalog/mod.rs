//! Model discovery and interactive model selection

use anyhow::Result;
use thiserror::Error;

use crate::service::{CompletionService, ServiceError};
use crate::terminal::Terminal;

/// Sorted, deduplicated model identifiers belonging to one model family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<String>,
}

impl ModelCatalog {
    /// Keep identifiers containing `family_marker`, sorted ascending
    pub fn from_ids<I>(ids: I, family_marker: &str) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut models: Vec<String> =
            ids.into_iter().filter(|id| id.contains(family_marker)).collect();
        models.sort();
        models.dedup();
        Self { models }
    }

    /// Fetch the model list from the service
    ///
    /// A remote failure is returned classified; the caller decides whether to abort.
    pub fn fetch<S>(service: &S, family_marker: &str) -> Result<Self, ServiceError>
    where
        S: CompletionService + ?Sized,
    {
        let ids = service.list_models().inspect_err(|e| {
            tracing::warn!(error = %e, "model listing failed");
        })?;
        let catalog = Self::from_ids(ids, family_marker);
        tracing::info!(count = catalog.len(), family = family_marker, "model catalog ready");
        Ok(catalog)
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.models.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please enter a number.")]
    NotANumber,

    #[error("That number is not one of the choices.")]
    OutOfRange,
}

/// Resolve one line of menu input to a model identifier
///
/// Empty input selects `default_model` without consulting the catalog.
pub fn parse_selection(
    input: &str,
    catalog: &ModelCatalog,
    default_model: &str,
) -> Result<String, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default_model.to_string());
    }

    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SelectionError::NotANumber);
    }

    // All digits but too large for usize is still just out of range
    let index = input.parse::<usize>().map_err(|_| SelectionError::OutOfRange)?;
    catalog.get(index).map(str::to_string).ok_or(SelectionError::OutOfRange)
}

/// Show the numbered menu and read until a valid choice is made
pub fn select_interactive(
    catalog: &ModelCatalog,
    default_model: &str,
    terminal: &mut dyn Terminal,
) -> Result<String> {
    let prompt = format!(
        "Enter the number of the model to use. Leave blank to use '{}': ",
        default_model
    );

    loop {
        for (i, model) in catalog.models().iter().enumerate() {
            terminal.info(&format!("{}: {}", i, model));
        }

        let Some(line) = terminal.read_line(&prompt)? else {
            tracing::debug!("input closed during model selection, using default");
            return Ok(default_model.to_string());
        };

        match parse_selection(&line, catalog, default_model) {
            Ok(model) => return Ok(model),
            Err(e) => terminal.error(&e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;
    use crate::terminal::ScriptedTerminal;

    fn abc() -> ModelCatalog {
        ModelCatalog { models: vec!["a".to_string(), "b".to_string(), "c".to_string()] }
    }

    struct FixedModels(Result<Vec<String>, ServiceError>);

    impl CompletionService for FixedModels {
        fn list_models(&self) -> Result<Vec<String>, ServiceError> {
            self.0.clone()
        }

        fn create_completion(&self, _: &str, _: &[Message]) -> Result<Message, ServiceError> {
            unreachable!("catalog never requests completions")
        }
    }

    #[test]
    fn test_from_ids_filters_sorts_and_dedups() {
        let ids = ["whisper-1", "gpt-4o", "gpt-3.5-turbo", "dall-e-3", "gpt-4o"]
            .into_iter()
            .map(String::from);
        let catalog = ModelCatalog::from_ids(ids, "gpt");
        assert_eq!(catalog.models(), ["gpt-3.5-turbo", "gpt-4o"]);
    }

    #[test]
    fn test_fetch_is_deterministic() {
        let service = FixedModels(Ok(vec![
            "gpt-4".to_string(),
            "babbage-002".to_string(),
            "gpt-3.5-turbo-16k".to_string(),
            "gpt-3.5-turbo".to_string(),
        ]));
        let first = ModelCatalog::fetch(&service, "gpt").unwrap();
        let second = ModelCatalog::fetch(&service, "gpt").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.models(), ["gpt-3.5-turbo", "gpt-3.5-turbo-16k", "gpt-4"]);
    }

    #[test]
    fn test_fetch_propagates_classified_error() {
        let service = FixedModels(Err(ServiceError::RateLimited("slow down".to_string())));
        let err = ModelCatalog::fetch(&service, "gpt").unwrap_err();
        assert_eq!(err, ServiceError::RateLimited("slow down".to_string()));
    }

    #[test]
    fn test_parse_selection_cases() {
        let catalog = abc();
        assert_eq!(parse_selection("", &catalog, "default").unwrap(), "default");
        assert_eq!(parse_selection("1", &catalog, "default").unwrap(), "b");
        assert_eq!(parse_selection(" 2 ", &catalog, "default").unwrap(), "c");
        assert_eq!(parse_selection("5", &catalog, "default"), Err(SelectionError::OutOfRange));
        assert_eq!(parse_selection("x", &catalog, "default"), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("-1", &catalog, "default"), Err(SelectionError::NotANumber));
        assert_eq!(
            parse_selection("99999999999999999999999", &catalog, "default"),
            Err(SelectionError::OutOfRange)
        );
    }

    #[test]
    fn test_empty_input_ignores_empty_catalog() {
        let empty = ModelCatalog::from_ids(Vec::new(), "gpt");
        assert_eq!(parse_selection("", &empty, "gpt-3.5-turbo").unwrap(), "gpt-3.5-turbo");
        assert_eq!(parse_selection("0", &empty, "gpt-3.5-turbo"), Err(SelectionError::OutOfRange));
    }

    #[test]
    fn test_select_interactive_reprompts_until_valid() {
        let catalog = abc();
        let mut terminal = ScriptedTerminal::new(["x", "5", "1"]);
        let model = select_interactive(&catalog, "default", &mut terminal).unwrap();

        assert_eq!(model, "b");
        assert_eq!(terminal.prompts.len(), 3);
        assert_eq!(
            terminal.errors,
            vec![SelectionError::NotANumber.to_string(), SelectionError::OutOfRange.to_string()]
        );
        // Menu is shown before every prompt
        assert_eq!(terminal.infos.len(), 9);
        assert_eq!(terminal.infos[0], "0: a");
    }

    #[test]
    fn test_select_interactive_end_of_input_uses_default() {
        let mut terminal = ScriptedTerminal::new(Vec::<String>::new());
        let model = select_interactive(&abc(), "default", &mut terminal).unwrap();
        assert_eq!(model, "default");
    }
}
