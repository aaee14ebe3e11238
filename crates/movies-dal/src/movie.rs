use std::{
    fmt::Display,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Error,
    error::Result,
    validation::{CreateMovie, UpdateMovie},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Fantasy,
    Horror,
    Thriller,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Crime,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Thriller,
        Genre::SciFi,
        Genre::Crime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
            Genre::Crime => "Crime",
        }
    }

    /// Case-insensitive match against a genre name as given by a client.
    pub fn matches(&self, name: &str) -> bool {
        self.as_str().to_lowercase() == name.to_lowercase()
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<Genre>,
    #[serde(default = "default_rate")]
    pub rate: f64,
}

fn default_rate() -> f64 {
    crate::DEFAULT_RATE
}

impl Movie {
    pub fn has_genre(&self, name: &str) -> bool {
        self.genre.iter().any(|g| g.matches(name))
    }

    fn merge(&mut self, update: UpdateMovie) {
        let UpdateMovie {
            title,
            year,
            director,
            duration,
            rate,
            poster,
            genre,
        } = update;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(year) = year {
            self.year = year;
        }
        if let Some(director) = director {
            self.director = director;
        }
        if let Some(duration) = duration {
            self.duration = duration;
        }
        if let Some(rate) = rate {
            self.rate = rate;
        }
        if let Some(poster) = poster {
            self.poster = poster;
        }
        if let Some(genre) = genre {
            self.genre = genre;
        }
    }
}

/// Shared handle to the in-process movie collection.
///
/// Every operation holds the lock for a single synchronous section, so a
/// poisoned lock never guards a half-written record and is simply recovered.
#[derive(Debug, Clone, Default)]
pub struct MovieStore {
    records: Arc<RwLock<Vec<Movie>>>,
}

impl MovieStore {
    pub fn new(records: Vec<Movie>) -> Self {
        MovieStore {
            records: Arc::new(RwLock::new(records)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Movie>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Movie>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MovieRepository {
    store: MovieStore,
}

impl MovieRepository {
    pub fn new(store: MovieStore) -> Self {
        Self { store }
    }

    pub fn list(&self, genre: Option<&str>) -> Vec<Movie> {
        let records = self.store.read();
        match genre.filter(|g| !g.is_empty()) {
            Some(genre) => records
                .iter()
                .filter(|m| m.has_genre(genre))
                .cloned()
                .collect(),
            None => records.clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.store.read().len()
    }

    pub fn get(&self, id: &str) -> Result<Movie> {
        self.store
            .read()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub fn create(&self, payload: CreateMovie) -> Movie {
        let CreateMovie {
            title,
            year,
            director,
            duration,
            rate,
            poster,
            genre,
        } = payload;
        let record = Movie {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            year,
            director,
            duration,
            poster,
            genre,
            rate,
        };
        self.store.write().push(record.clone());
        debug!("Created movie {}", record.id);
        record
    }

    pub fn update(&self, id: &str, payload: UpdateMovie) -> Result<Movie> {
        let mut records = self.store.write();
        let record = records
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found(id))?;
        record.merge(payload);
        debug!("Updated movie {id}");
        Ok(record.clone())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.store.write();
        let index = records
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| not_found(id))?;
        records.remove(index);
        debug!("Deleted movie {id}");
        Ok(())
    }
}

fn not_found(id: &str) -> Error {
    debug!("Movie {id} not found");
    Error::RecordNotFound("Movie".to_string())
}
