use serde::{Deserialize, Serialize};

/// A stored book as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Storage-assigned identifier; never reused
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
}

/// Request body for creating a book or replacing one in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCreate {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
}

impl BookCreate {
    /// Materialize a stored book under the given id.
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            genre: self.genre,
            description: self.description,
        }
    }
}

/// Request body for a partial update.
///
/// An omitted field (or an explicit `null`) leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookUpdate {
    /// Overwrite only the fields present in this update.
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(year) = self.year {
            book.year = year;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.year.is_none()
            && self.genre.is_none()
            && self.description.is_none()
    }
}

/// A full replacement is a partial update with every field present.
impl From<BookCreate> for BookUpdate {
    fn from(input: BookCreate) -> Self {
        Self {
            title: Some(input.title),
            author: Some(input.author),
            year: Some(input.year),
            genre: Some(input.genre),
            description: Some(input.description),
        }
    }
}

/// Response body for a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteStatus {
    pub status: String,
    pub message: String,
}

impl DeleteStatus {
    pub fn deleted() -> Self {
        Self {
            status: "success".to_string(),
            message: "Book deleted successfully".to_string(),
        }
    }
}
