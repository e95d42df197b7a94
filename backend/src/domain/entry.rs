//! Journal entry model and the value objects of the owner-scoped query engine.
//!
//! Every entry belongs to exactly one [`crate::domain::UserId`]; lookups are
//! always keyed jointly by `(entry id, owner id)` so that a foreign owner's
//! entry is indistinguishable from a missing one. Partial updates carry
//! explicit per-field presence ([`EntryPatch`]) rather than inferring intent
//! from default values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Validation errors raised by the entry value-object constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// The identifier was not a valid UUID.
    InvalidId,
    /// The title was empty once trimmed.
    EmptyTitle,
    /// The title exceeded the stored column width.
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The content was empty once trimmed.
    EmptyContent,
    /// The content exceeded the maximum length.
    ContentTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The category string did not name a known category.
    UnknownCategory,
    /// The phonetic text exceeded the stored column width.
    PhoneticTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The example text exceeded the maximum length.
    ExampleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "entry id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "content must be at most {max} characters")
            }
            Self::UnknownCategory => {
                write!(f, "category must be one of Fact, Word, Insight, or Quote")
            }
            Self::PhoneticTooLong { max } => {
                write!(f, "phonetic must be at most {max} characters")
            }
            Self::ExampleTooLong { max } => {
                write!(f, "example must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for EntryValidationError {}

/// Stable entry identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Validate and construct an [`EntryId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, EntryValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| EntryValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`EntryId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed set of entry categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryCategory {
    /// A fact worth remembering.
    #[default]
    Fact,
    /// A word and its meaning.
    Word,
    /// A personal insight.
    Insight,
    /// A quotation.
    Quote,
}

impl EntryCategory {
    /// Canonical string form, as stored and serialised.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fact => "Fact",
            Self::Word => "Word",
            Self::Insight => "Insight",
            Self::Quote => "Quote",
        }
    }
}

impl FromStr for EntryCategory {
    type Err = EntryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fact" => Ok(Self::Fact),
            "Word" => Ok(Self::Word),
            "Insight" => Ok(Self::Insight),
            "Quote" => Ok(Self::Quote),
            _ => Err(EntryValidationError::UnknownCategory),
        }
    }
}

impl fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum stored length for an entry title.
pub const TITLE_MAX: usize = 255;
/// Maximum stored length for entry content.
pub const CONTENT_MAX: usize = 5000;
/// Maximum stored length for the phonetic text.
pub const PHONETIC_MAX: usize = 255;
/// Maximum stored length for the example text.
pub const EXAMPLE_MAX: usize = 2000;

/// Non-empty, bounded entry title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTitle(String);

impl EntryTitle {
    /// Validate and construct an [`EntryTitle`] from owned input.
    pub fn new(title: impl Into<String>) -> Result<Self, EntryValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(EntryValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(EntryValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }

    /// Borrow the title as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntryTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty, bounded entry content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryContent(String);

impl EntryContent {
    /// Validate and construct [`EntryContent`] from owned input.
    pub fn new(content: impl Into<String>) -> Result<Self, EntryValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(EntryValidationError::EmptyContent);
        }
        if content.chars().count() > CONTENT_MAX {
            return Err(EntryValidationError::ContentTooLong { max: CONTENT_MAX });
        }
        Ok(Self(content))
    }

    /// Borrow the content as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntryContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional phonetic rendering of a word entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phonetic(String);

impl Phonetic {
    /// Validate and construct a [`Phonetic`] from owned input.
    pub fn new(phonetic: impl Into<String>) -> Result<Self, EntryValidationError> {
        let phonetic = phonetic.into();
        if phonetic.chars().count() > PHONETIC_MAX {
            return Err(EntryValidationError::PhoneticTooLong { max: PHONETIC_MAX });
        }
        Ok(Self(phonetic))
    }

    /// Borrow the phonetic text as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Phonetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional usage example attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example(String);

impl Example {
    /// Validate and construct an [`Example`] from owned input.
    pub fn new(example: impl Into<String>) -> Result<Self, EntryValidationError> {
        let example = example.into();
        if example.chars().count() > EXAMPLE_MAX {
            return Err(EntryValidationError::ExampleTooLong { max: EXAMPLE_MAX });
        }
        Ok(Self(example))
    }

    /// Borrow the example text as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted journal entry.
///
/// ## Invariants
/// - `owner` always references an existing user; the store cascades deletes.
/// - `updated_at >= created_at`; every mutation refreshes `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    /// Stable entry identifier.
    pub id: EntryId,
    /// Owning user; never changes after creation.
    pub owner: UserId,
    /// Entry title.
    pub title: EntryTitle,
    /// Entry body.
    pub content: EntryContent,
    /// Category bucket.
    pub category: EntryCategory,
    /// Optional phonetic rendering.
    pub phonetic: Option<Phonetic>,
    /// Optional usage example.
    pub example: Option<Example>,
    /// Favorite flag.
    pub is_favorite: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating a new entry.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    /// Entry title.
    pub title: EntryTitle,
    /// Entry body.
    pub content: EntryContent,
    /// Category bucket; defaults to [`EntryCategory::Fact`].
    pub category: EntryCategory,
    /// Optional phonetic rendering.
    pub phonetic: Option<Phonetic>,
    /// Optional usage example.
    pub example: Option<Example>,
    /// Favorite flag; defaults to `false`.
    pub is_favorite: bool,
}

/// Partial update where each field is independently present or absent.
///
/// `None` means "leave untouched". For the nullable fields the inner option
/// distinguishes "set to this value" from "clear": `Some(None)` erases the
/// stored value. Presence is never inferred from a field equalling its
/// default.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    /// Replacement title, when supplied.
    pub title: Option<EntryTitle>,
    /// Replacement content, when supplied.
    pub content: Option<EntryContent>,
    /// Replacement category, when supplied.
    pub category: Option<EntryCategory>,
    /// Replacement or cleared phonetic text, when supplied.
    pub phonetic: Option<Option<Phonetic>>,
    /// Replacement or cleared example text, when supplied.
    pub example: Option<Option<Example>>,
    /// Replacement favorite flag, when supplied.
    pub is_favorite: Option<bool>,
}

impl EntryPatch {
    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.phonetic.is_none()
            && self.example.is_none()
            && self.is_favorite.is_none()
    }
}

/// Optional filters applied on top of the mandatory owner conjunct.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Restrict to a single category.
    pub category: Option<EntryCategory>,
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
    /// Restrict to favorites (`true`) or non-favorites (`false`).
    pub is_favorite: Option<bool>,
}

impl EntryFilter {
    /// The effective search term, if one was supplied and is not blank.
    ///
    /// An empty or whitespace-only search string behaves as if no search was
    /// requested at all.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Pagination validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// `skip` was negative.
    #[error("skip must be zero or greater")]
    NegativeSkip,
    /// `limit` fell outside the accepted window.
    #[error("limit must be between {min} and {max}")]
    LimitOutOfRange {
        /// Smallest accepted limit.
        min: i64,
        /// Largest accepted limit.
        max: i64,
    },
}

/// Smallest accepted page size.
pub const LIMIT_MIN: i64 = 1;
/// Largest accepted page size.
pub const LIMIT_MAX: i64 = 100;
/// Page size applied when the caller does not specify one.
pub const LIMIT_DEFAULT: i64 = 20;

/// Validated zero-based offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    skip: i64,
    limit: i64,
}

impl Pagination {
    /// Validate and construct a pagination window.
    pub fn new(skip: i64, limit: i64) -> Result<Self, PaginationError> {
        if skip < 0 {
            return Err(PaginationError::NegativeSkip);
        }
        if !(LIMIT_MIN..=LIMIT_MAX).contains(&limit) {
            return Err(PaginationError::LimitOutOfRange {
                min: LIMIT_MIN,
                max: LIMIT_MAX,
            });
        }
        Ok(Self { skip, limit })
    }

    /// Number of leading rows to skip.
    pub fn skip(&self) -> i64 {
        self.skip
    }

    /// Maximum number of rows in the page.
    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: LIMIT_DEFAULT,
        }
    }
}

/// One page of entries together with the filter-wide total.
#[derive(Debug, Clone)]
pub struct EntryPage {
    /// Entries of the requested page, most recent first.
    pub entries: Vec<JournalEntry>,
    /// Total matching rows independent of pagination.
    pub total: i64,
    /// Effective offset used for the page.
    pub skip: i64,
    /// Effective limit used for the page.
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Fact", EntryCategory::Fact)]
    #[case("Word", EntryCategory::Word)]
    #[case("Insight", EntryCategory::Insight)]
    #[case("Quote", EntryCategory::Quote)]
    fn category_parses_canonical_names(#[case] raw: &str, #[case] expected: EntryCategory) {
        assert_eq!(raw.parse::<EntryCategory>().expect("known"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("fact")]
    #[case("FACT")]
    #[case("Other")]
    #[case("")]
    fn category_rejects_unknown_names(#[case] raw: &str) {
        assert_eq!(
            raw.parse::<EntryCategory>().expect_err("unknown"),
            EntryValidationError::UnknownCategory
        );
    }

    #[rstest]
    fn category_defaults_to_fact() {
        assert_eq!(EntryCategory::default(), EntryCategory::Fact);
    }

    #[rstest]
    fn title_rejects_blank_and_oversized_input() {
        assert_eq!(
            EntryTitle::new("  ").expect_err("blank"),
            EntryValidationError::EmptyTitle
        );
        assert_eq!(
            EntryTitle::new("t".repeat(TITLE_MAX + 1)).expect_err("long"),
            EntryValidationError::TitleTooLong { max: TITLE_MAX }
        );
        assert!(EntryTitle::new("t".repeat(TITLE_MAX)).is_ok());
    }

    #[rstest]
    fn content_rejects_blank_and_oversized_input() {
        assert_eq!(
            EntryContent::new("").expect_err("blank"),
            EntryValidationError::EmptyContent
        );
        assert_eq!(
            EntryContent::new("c".repeat(CONTENT_MAX + 1)).expect_err("long"),
            EntryValidationError::ContentTooLong { max: CONTENT_MAX }
        );
    }

    #[rstest]
    fn optional_fields_enforce_bounds_only() {
        assert!(Phonetic::new("").is_ok());
        assert_eq!(
            Phonetic::new("p".repeat(PHONETIC_MAX + 1)).expect_err("long"),
            EntryValidationError::PhoneticTooLong { max: PHONETIC_MAX }
        );
        assert_eq!(
            Example::new("e".repeat(EXAMPLE_MAX + 1)).expect_err("long"),
            EntryValidationError::ExampleTooLong { max: EXAMPLE_MAX }
        );
    }

    #[rstest]
    fn empty_patch_reports_empty() {
        assert!(EntryPatch::default().is_empty());
        let patch = EntryPatch {
            is_favorite: Some(false),
            ..EntryPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[rstest]
    fn explicit_clear_is_distinct_from_absent() {
        let absent = EntryPatch::default();
        let cleared = EntryPatch {
            phonetic: Some(None),
            ..EntryPatch::default()
        };
        assert!(absent.phonetic.is_none());
        assert_eq!(cleared.phonetic, Some(None));
    }

    #[rstest]
    fn blank_search_terms_are_ignored() {
        let filter = EntryFilter {
            search: Some("   ".into()),
            ..EntryFilter::default()
        };
        assert_eq!(filter.search_term(), None);

        let filter = EntryFilter {
            search: Some(" hello ".into()),
            ..EntryFilter::default()
        };
        assert_eq!(filter.search_term(), Some("hello"));
    }

    #[rstest]
    #[case(-1, 20, PaginationError::NegativeSkip)]
    #[case(0, 0, PaginationError::LimitOutOfRange { min: LIMIT_MIN, max: LIMIT_MAX })]
    #[case(0, 101, PaginationError::LimitOutOfRange { min: LIMIT_MIN, max: LIMIT_MAX })]
    fn pagination_rejects_out_of_range_values(
        #[case] skip: i64,
        #[case] limit: i64,
        #[case] expected: PaginationError,
    ) {
        assert_eq!(Pagination::new(skip, limit).expect_err("invalid"), expected);
    }

    #[rstest]
    fn pagination_accepts_boundary_values() {
        assert!(Pagination::new(0, LIMIT_MIN).is_ok());
        assert!(Pagination::new(1_000_000, LIMIT_MAX).is_ok());
        let default = Pagination::default();
        assert_eq!(default.skip(), 0);
        assert_eq!(default.limit(), LIMIT_DEFAULT);
    }
}
