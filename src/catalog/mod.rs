//! Movie catalog: demo titles behind a source seam so screens never own
//! literal data.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    All,
    Drama,
    Comedy,
    Thriller,
    SciFi,
    Action,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Drama,
        Category::Comedy,
        Category::Thriller,
        Category::SciFi,
        Category::Action,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Drama => "Drama",
            Category::Comedy => "Comedy",
            Category::Thriller => "Thrillers",
            Category::SciFi => "Sci-Fi",
            Category::Action => "Action",
        }
    }

    /// Cycles through the filter bar order.
    pub fn next(&self) -> Category {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct Movie {
    pub id: u32,
    pub title: String,
    pub genre: &'static str,
    pub category: Category,
    pub rating: f32,
    pub year: u16,
    pub is_new: bool,
}

#[derive(Debug, Clone)]
pub struct MovieRow {
    pub title: String,
    pub movies: Vec<Movie>,
}

/// Where the dashboard gets its rows. The demo source is fixed data; a real
/// client would back this with a catalog service.
pub trait CatalogSource {
    fn rows(&self) -> Vec<MovieRow>;
}

pub struct DemoCatalog;

impl CatalogSource for DemoCatalog {
    fn rows(&self) -> Vec<MovieRow> {
        vec![
            MovieRow {
                title: "Trending".to_string(),
                movies: vec![
                    movie(1, "The Last Drop", "Drama", Category::Drama, 8.9, 2024, true),
                    movie(2, "Night City", "Thriller", Category::Thriller, 7.8, 2024, true),
                    movie(3, "Coming Home", "Comedy", Category::Comedy, 8.2, 2023, false),
                    movie(4, "Shadows of the Past", "Mystery", Category::Thriller, 8.5, 2024, false),
                    movie(5, "Heart of the Ocean", "Adventure", Category::Action, 7.9, 2023, false),
                ],
            },
            MovieRow {
                title: "New releases".to_string(),
                movies: vec![
                    movie(6, "Star Route", "Sci-Fi", Category::SciFi, 8.9, 2024, true),
                    movie(7, "Forgotten Stories", "Drama", Category::Drama, 8.7, 2024, true),
                    movie(8, "The Dark Side", "Thriller", Category::Thriller, 8.4, 2024, true),
                    movie(9, "Light of Hope", "Romance", Category::Drama, 7.6, 2024, false),
                    movie(10, "Game of Shadows", "Mystery", Category::Thriller, 7.5, 2024, false),
                ],
            },
            MovieRow {
                title: "Popular series".to_string(),
                movies: vec![
                    movie(11, "Space Odyssey", "Sci-Fi", Category::SciFi, 9.2, 2023, false),
                    movie(12, "Paradise Lost", "Drama", Category::Drama, 8.9, 2023, false),
                    movie(13, "Winds of Change", "Adventure", Category::Action, 8.6, 2023, false),
                    movie(14, "Call of the Wild", "Documentary", Category::Drama, 8.8, 2024, false),
                    movie(15, "Last Chance", "Drama", Category::Drama, 8.0, 2023, false),
                ],
            },
        ]
    }
}

fn movie(
    id: u32,
    title: &str,
    genre: &'static str,
    category: Category,
    rating: f32,
    year: u16,
    is_new: bool,
) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        genre,
        category,
        rating,
        year,
        is_new,
    }
}

/// Case-insensitive title search plus category filter. An empty query
/// matches everything; `All` passes every category.
pub fn filter_row(row: &MovieRow, query: &str, category: Category) -> MovieRow {
    let needle = query.trim().to_lowercase();
    let movies = row
        .movies
        .iter()
        .filter(|m| category == Category::All || m.category == category)
        .filter(|m| needle.is_empty() || m.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    MovieRow {
        title: row.title.clone(),
        movies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = DemoCatalog.rows();
        let hits = filter_row(&rows[0], "night", Category::All);
        assert_eq!(hits.movies.len(), 1);
        assert_eq!(hits.movies[0].title, "Night City");

        let none = filter_row(&rows[0], "zebra", Category::All);
        assert!(none.movies.is_empty());
    }

    #[test]
    fn category_filter_keeps_matching_titles_only() {
        let rows = DemoCatalog.rows();
        let thrillers = filter_row(&rows[0], "", Category::Thriller);
        assert!(thrillers
            .movies
            .iter()
            .all(|m| m.category == Category::Thriller));
        assert_eq!(thrillers.movies.len(), 2);

        let all = filter_row(&rows[0], "", Category::All);
        assert_eq!(all.movies.len(), rows[0].movies.len());
    }

    #[test]
    fn category_cycle_wraps_around() {
        let mut c = Category::All;
        for _ in 0..Category::ALL.len() {
            c = c.next();
        }
        assert_eq!(c, Category::All);
        assert_eq!(Category::Action.next(), Category::All);
    }
}
