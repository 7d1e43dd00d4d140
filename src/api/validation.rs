use std::collections::HashMap;

use super::error::ApiError;
use crate::models::media::{CreateMedia, TmdbOverrides, UpdateMedia, has_text};

const MAX_TITLE_LEN: usize = 255;
const MAX_REVIEW_LEN: usize = 1000;
pub const MIN_SEARCH_LIMIT: i64 = 1;
pub const MAX_SEARCH_LIMIT: i64 = 50;

fn validation_error(field_errors: HashMap<String, String>) -> ApiError {
    ApiError::Validation {
        message: "The submitted data is not valid".to_string(),
        field_errors,
    }
}

fn check_title(errors: &mut HashMap<String, String>, field: &str, title: Option<&str>) {
    if let Some(title) = title {
        if title.chars().count() > MAX_TITLE_LEN {
            errors.insert(
                field.to_string(),
                format!("must be at most {MAX_TITLE_LEN} characters"),
            );
        }
    }
}

fn check_rating(errors: &mut HashMap<String, String>, rating: Option<f32>) {
    if let Some(rating) = rating {
        if !(0.0..=5.0).contains(&rating) {
            errors.insert(
                "rating".to_string(),
                "must be between 0 and 5".to_string(),
            );
        }
    }
}

fn check_review(errors: &mut HashMap<String, String>, review: Option<&str>) {
    if let Some(review) = review {
        if review.chars().count() > MAX_REVIEW_LEN {
            errors.insert(
                "review".to_string(),
                format!("must be at most {MAX_REVIEW_LEN} characters"),
            );
        }
    }
}

fn check_view_count(errors: &mut HashMap<String, String>, view_count: Option<i32>) {
    if let Some(view_count) = view_count {
        if view_count < 0 {
            errors.insert("viewCount".to_string(), "must not be negative".to_string());
        }
    }
}

pub fn validate_create(command: &CreateMedia) -> Result<(), ApiError> {
    let mut errors = HashMap::new();
    if !has_text(Some(command.title.as_str())) {
        errors.insert("title".to_string(), "Title is required".to_string());
    }
    check_title(&mut errors, "title", Some(command.title.as_str()));
    check_rating(&mut errors, command.rating);
    check_review(&mut errors, command.review.as_deref());
    check_view_count(&mut errors, command.view_count);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(validation_error(errors))
    }
}

/// Validates the reconciliation payload and extracts its required
/// TMDB id.
pub fn validate_overrides(command: &TmdbOverrides) -> Result<i32, ApiError> {
    let mut errors = HashMap::new();
    if command.tmdb_id.is_none() {
        errors.insert("tmdbId".to_string(), "TMDB id is required".to_string());
    }
    check_title(&mut errors, "titleOverride", command.title_override.as_deref());
    check_rating(&mut errors, command.rating);
    check_review(&mut errors, command.review.as_deref());
    check_view_count(&mut errors, command.view_count);

    match command.tmdb_id {
        Some(tmdb_id) if errors.is_empty() => Ok(tmdb_id),
        _ => Err(validation_error(errors)),
    }
}

pub fn validate_update(command: &UpdateMedia) -> Result<(), ApiError> {
    let mut errors = HashMap::new();
    check_title(&mut errors, "title", command.title.as_deref());
    check_rating(&mut errors, command.rating);
    check_review(&mut errors, command.review.as_deref());
    check_view_count(&mut errors, command.view_count);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(validation_error(errors))
    }
}

/// Strict limit check used by the kind-specific search endpoints. The
/// multi search clamps instead; both behaviours are deliberate.
pub fn validate_search_limit(limit: i64) -> Result<usize, ApiError> {
    if (MIN_SEARCH_LIMIT..=MAX_SEARCH_LIMIT).contains(&limit) {
        #[allow(clippy::cast_sign_loss)]
        Ok(limit as usize)
    } else {
        let mut errors = HashMap::new();
        errors.insert(
            "limit".to_string(),
            format!("must be between {MIN_SEARCH_LIMIT} and {MAX_SEARCH_LIMIT}"),
        );
        Err(validation_error(errors))
    }
}

/// Lenient variant for the multi search: out-of-range limits are
/// clamped into bounds instead of rejected.
pub fn clamp_search_limit(limit: i64) -> usize {
    #[allow(clippy::cast_sign_loss)]
    {
        limit.clamp(MIN_SEARCH_LIMIT, MAX_SEARCH_LIMIT) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(err: ApiError) -> HashMap<String, String> {
        match err {
            ApiError::Validation { field_errors, .. } => field_errors,
            other => panic!("expected a validation error, got {other}"),
        }
    }

    #[test]
    fn create_requires_non_blank_title() {
        let command = CreateMedia {
            title: "   ".to_string(),
            tmdb_id: None,
            rating: None,
            wishlist: None,
            review: None,
            view_count: None,
            watched: None,
        };
        let errors = field_errors(validate_create(&command).unwrap_err());
        assert!(errors.contains_key("title"));
    }

    #[test]
    fn create_rejects_out_of_range_rating() {
        let command = CreateMedia {
            title: "Heat".to_string(),
            tmdb_id: None,
            rating: Some(5.5),
            wishlist: None,
            review: None,
            view_count: None,
            watched: None,
        };
        let errors = field_errors(validate_create(&command).unwrap_err());
        assert!(errors.contains_key("rating"));
    }

    #[test]
    fn overrides_require_tmdb_id() {
        let errors = field_errors(validate_overrides(&TmdbOverrides::default()).unwrap_err());
        assert!(errors.contains_key("tmdbId"));

        let command = TmdbOverrides {
            tmdb_id: Some(603),
            ..Default::default()
        };
        assert_eq!(validate_overrides(&command).unwrap(), 603);
    }

    #[test]
    fn update_rejects_overlong_review() {
        let command = UpdateMedia {
            review: Some("x".repeat(MAX_REVIEW_LEN + 1)),
            ..Default::default()
        };
        let errors = field_errors(validate_update(&command).unwrap_err());
        assert!(errors.contains_key("review"));
    }

    #[test]
    fn strict_limit_rejects_and_lenient_clamps() {
        assert!(validate_search_limit(0).is_err());
        assert!(validate_search_limit(51).is_err());
        assert_eq!(validate_search_limit(20).unwrap(), 20);

        assert_eq!(clamp_search_limit(0), 1);
        assert_eq!(clamp_search_limit(500), 50);
        assert_eq!(clamp_search_limit(20), 20);
    }
}
