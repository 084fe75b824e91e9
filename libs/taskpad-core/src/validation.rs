//! Input validation and normalization
//!
//! Every rule here runs before any storage call, so validation failures
//! never leave partial state behind. The boolean and priority normalizers
//! accept a closed set of textual and numeric representations; anything
//! outside the set is rejected rather than silently coerced.

use crate::error::{Result, TaskpadError};
use crate::models::{BoolInput, Priority, PriorityInput, SortField, SortOrder};
use taskpad_common::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DESCRIPTION_MAX_LEN, MAX_PAGE_SIZE, TITLE_MAX_LEN,
};

/// Normalize a loosely-typed completed flag to a strict boolean
///
/// Accepted values: `true`, `false`, `1`, `0`, `"true"`, `"false"`, `"1"`, `"0"`.
///
/// # Errors
///
/// Returns a validation error for anything outside the accepted set.
pub fn normalize_completed(input: &BoolInput) -> Result<bool> {
    match input {
        BoolInput::Bool(value) => Ok(*value),
        BoolInput::Int(1) => Ok(true),
        BoolInput::Int(0) => Ok(false),
        BoolInput::Int(other) => Err(TaskpadError::validation(format!(
            "completed must be a boolean, 0/1, or \"true\"/\"false\", got {other}"
        ))),
        BoolInput::Text(text) => match text.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(TaskpadError::validation(format!(
                "completed must be a boolean, 0/1, or \"true\"/\"false\", got \"{other}\""
            ))),
        },
    }
}

/// Normalize a loosely-typed priority to the enum
///
/// # Errors
///
/// Returns a validation error unless the input parses to an integer in 1..=3.
pub fn normalize_priority(input: &PriorityInput) -> Result<Priority> {
    let value = match input {
        PriorityInput::Int(value) => *value,
        PriorityInput::Text(text) => text.trim().parse::<i64>().map_err(|_| {
            TaskpadError::validation(format!("priority must be an integer, got \"{text}\""))
        })?,
    };
    Priority::from_i64(value)
        .ok_or_else(|| TaskpadError::validation(format!("priority must be 1, 2, or 3, got {value}")))
}

/// Validate and trim a task title
///
/// # Errors
///
/// Returns a validation error when the trimmed title is empty or longer
/// than 200 characters.
pub fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskpadError::validation("title must not be empty"));
    }
    if trimmed.chars().count() > TITLE_MAX_LEN {
        return Err(TaskpadError::validation(format!(
            "title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate and trim a task description; absent means empty
///
/// # Errors
///
/// Returns a validation error when the trimmed description exceeds
/// 1000 characters.
pub fn normalize_description(description: Option<&str>) -> Result<String> {
    let trimmed = description.unwrap_or("").trim();
    if trimmed.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(TaskpadError::validation(format!(
            "description must be at most {DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate that an id is a positive integer
///
/// # Errors
///
/// Returns a validation error naming `what` when the id is not positive.
pub fn validate_id(id: i64, what: &str) -> Result<()> {
    if id <= 0 {
        return Err(TaskpadError::validation(format!(
            "{what} id must be a positive integer, got {id}"
        )));
    }
    Ok(())
}

/// Normalize a batch id list: non-empty, all positive, deduplicated
///
/// Duplicates are removed preserving first-occurrence order.
///
/// # Errors
///
/// Returns a validation error for an empty list, or one naming every
/// non-positive id.
pub fn normalize_batch_ids(ids: &[i64]) -> Result<Vec<i64>> {
    if ids.is_empty() {
        return Err(TaskpadError::validation("ids must be a non-empty list"));
    }

    let invalid: Vec<i64> = ids.iter().copied().filter(|id| *id <= 0).collect();
    if !invalid.is_empty() {
        let listed = invalid
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(TaskpadError::validation(format!(
            "ids must be positive integers, got: {listed}"
        )));
    }

    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    Ok(unique)
}

/// Validate and trim a search query
///
/// # Errors
///
/// Returns a validation error when the trimmed query is empty.
pub fn normalize_search_query(query: &str) -> Result<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(TaskpadError::validation("search query must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Validate and trim a category name
///
/// # Errors
///
/// Returns a validation error when the trimmed name is empty.
pub fn normalize_category_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TaskpadError::validation("category name must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Validate and trim a category color
///
/// # Errors
///
/// Returns a validation error when the trimmed color is empty.
pub fn normalize_category_color(color: &str) -> Result<String> {
    let trimmed = color.trim();
    if trimmed.is_empty() {
        return Err(TaskpadError::validation("category color must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Parse a sort column, falling back to `created_at` for unknown values
#[must_use]
pub fn parse_sort_field(input: Option<&str>) -> SortField {
    match input {
        Some("title") => SortField::Title,
        Some("priority") => SortField::Priority,
        Some("completed") => SortField::Completed,
        _ => SortField::default(),
    }
}

/// Parse a sort direction (case-insensitive), falling back to descending
#[must_use]
pub fn parse_sort_order(input: Option<&str>) -> SortOrder {
    match input.map(str::to_ascii_lowercase).as_deref() {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::default(),
    }
}

/// Resolve page and limit to effective values
///
/// Both are floored at 1; the limit is capped at 100 server-side.
#[must_use]
pub fn normalize_pagination(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1).min(MAX_PAGE_SIZE);
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_completed_accepted_set() {
        let truthy = [
            BoolInput::Bool(true),
            BoolInput::Int(1),
            BoolInput::Text("true".to_string()),
            BoolInput::Text("1".to_string()),
        ];
        for input in truthy {
            assert_eq!(normalize_completed(&input).unwrap(), true);
        }

        let falsy = [
            BoolInput::Bool(false),
            BoolInput::Int(0),
            BoolInput::Text("false".to_string()),
            BoolInput::Text("0".to_string()),
        ];
        for input in falsy {
            assert_eq!(normalize_completed(&input).unwrap(), false);
        }
    }

    #[test]
    fn test_normalize_completed_rejects_unrecognized_input() {
        let rejected = [
            BoolInput::Int(2),
            BoolInput::Int(-1),
            BoolInput::Text("yes".to_string()),
            BoolInput::Text("TRUE".to_string()),
            BoolInput::Text(String::new()),
        ];
        for input in rejected {
            let error = normalize_completed(&input).unwrap_err();
            assert!(error.is_validation(), "expected rejection for {input:?}");
        }
    }

    #[test]
    fn test_normalize_priority() {
        assert_eq!(
            normalize_priority(&PriorityInput::Int(1)).unwrap(),
            Priority::Low
        );
        assert_eq!(
            normalize_priority(&PriorityInput::Text("3".to_string())).unwrap(),
            Priority::High
        );
        assert_eq!(
            normalize_priority(&PriorityInput::Text(" 2 ".to_string())).unwrap(),
            Priority::Medium
        );

        assert!(normalize_priority(&PriorityInput::Int(0)).is_err());
        assert!(normalize_priority(&PriorityInput::Int(4)).is_err());
        assert!(normalize_priority(&PriorityInput::Text("high".to_string())).is_err());
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Buy milk  ").unwrap(), "Buy milk");
        assert_eq!(normalize_title("a").unwrap(), "a");
        assert_eq!(normalize_title(&"x".repeat(200)).unwrap().len(), 200);

        assert!(normalize_title("").is_err());
        assert!(normalize_title("   ").is_err());
        assert!(normalize_title(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(None).unwrap(), "");
        assert_eq!(normalize_description(Some("  notes  ")).unwrap(), "notes");
        assert_eq!(
            normalize_description(Some(&"y".repeat(1000))).unwrap().len(),
            1000
        );

        assert!(normalize_description(Some(&"y".repeat(1001))).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id(1, "task").is_ok());
        assert!(validate_id(i64::MAX, "task").is_ok());

        let error = validate_id(0, "task").unwrap_err();
        assert!(error.to_string().contains("task id"));
        assert!(validate_id(-5, "category").is_err());
    }

    #[test]
    fn test_normalize_batch_ids_dedupes_preserving_order() {
        let ids = normalize_batch_ids(&[3, 1, 3, 2, 1]).unwrap();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_normalize_batch_ids_rejects_empty_list() {
        let error = normalize_batch_ids(&[]).unwrap_err();
        assert!(error.is_validation());
    }

    #[test]
    fn test_normalize_batch_ids_names_offenders() {
        let error = normalize_batch_ids(&[1, 0, -7]).unwrap_err();
        let message = error.to_string();
        assert!(message.contains('0'));
        assert!(message.contains("-7"));
    }

    #[test]
    fn test_normalize_search_query() {
        assert_eq!(normalize_search_query("  milk  ").unwrap(), "milk");
        assert!(normalize_search_query("").is_err());
        assert!(normalize_search_query("   ").is_err());
    }

    #[test]
    fn test_normalize_category_fields() {
        assert_eq!(normalize_category_name(" Home ").unwrap(), "Home");
        assert_eq!(normalize_category_color(" #00FF00 ").unwrap(), "#00FF00");
        assert!(normalize_category_name("  ").is_err());
        assert!(normalize_category_color("").is_err());
    }

    #[test]
    fn test_parse_sort_field_falls_back_to_created_at() {
        assert_eq!(parse_sort_field(Some("title")), SortField::Title);
        assert_eq!(parse_sort_field(Some("priority")), SortField::Priority);
        assert_eq!(parse_sort_field(Some("completed")), SortField::Completed);
        assert_eq!(parse_sort_field(Some("created_at")), SortField::CreatedAt);
        assert_eq!(parse_sort_field(Some("id; DROP TABLE")), SortField::CreatedAt);
        assert_eq!(parse_sort_field(None), SortField::CreatedAt);
    }

    #[test]
    fn test_parse_sort_order_falls_back_to_desc() {
        assert_eq!(parse_sort_order(Some("asc")), SortOrder::Asc);
        assert_eq!(parse_sort_order(Some("ASC")), SortOrder::Asc);
        assert_eq!(parse_sort_order(Some("desc")), SortOrder::Desc);
        assert_eq!(parse_sort_order(Some("sideways")), SortOrder::Desc);
        assert_eq!(parse_sort_order(None), SortOrder::Desc);
    }

    #[test]
    fn test_normalize_pagination() {
        assert_eq!(normalize_pagination(None, None), (1, 10));
        assert_eq!(normalize_pagination(Some(3), Some(25)), (3, 25));
        assert_eq!(normalize_pagination(Some(0), Some(-5)), (1, 1));
        assert_eq!(normalize_pagination(Some(2), Some(500)), (2, 100));
    }

    proptest! {
        #[test]
        fn prop_normalize_completed_never_panics(text in ".*") {
            let _ = normalize_completed(&BoolInput::Text(text));
        }

        #[test]
        fn prop_normalize_completed_int_accepts_exactly_zero_and_one(value in any::<i64>()) {
            let result = normalize_completed(&BoolInput::Int(value));
            if value == 0 || value == 1 {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(result.is_err());
            }
        }

        #[test]
        fn prop_title_length_boundary(len in 0usize..400) {
            let title = "x".repeat(len);
            let result = normalize_title(&title);
            if len >= 1 && len <= 200 {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(result.is_err());
            }
        }

        #[test]
        fn prop_pagination_always_within_bounds(
            page in proptest::option::of(any::<i64>()),
            limit in proptest::option::of(any::<i64>()),
        ) {
            let (page, limit) = normalize_pagination(page, limit);
            prop_assert!(page >= 1);
            prop_assert!(limit >= 1 && limit <= 100);
        }
    }
}
