//! File categorization by extension.
//!
//! Every file is sorted into exactly one [`Category`] based on its lowercase
//! extension. The lookup table is held by [`FileMapper`] so a different table
//! can be swapped in without touching the sorting pipeline.
//!
//! # Examples
//!
//! ```
//! use clean_folder::file_category::{Category, FileMapper};
//!
//! let mapper = FileMapper::default();
//! assert_eq!(mapper.extension_to_category(".mp3"), Some(Category::Audio));
//! assert_eq!(mapper.extension_to_category(".PDF"), Some(Category::Documents));
//! assert_eq!(mapper.extension_to_category(".rs"), None);
//! ```
use crate::stats::StatsStore;
use std::collections::HashMap;
use std::path::Path;

/// A top-level classification bucket.
///
/// The directory name of each category is the name of the subfolder created
/// under the sorted root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Audio files (MP3, OGG, WAV, ...)
    Audio,
    /// Document files (DOCX, TXT, PDF, ...)
    Documents,
    /// Image files (JPEG, PNG, SVG, ...)
    Images,
    /// Video files (AVI, MP4, MKV, ...)
    Video,
    /// Archives that get unpacked (ZIP, GZ, TAR)
    Archives,
    /// Everything the table does not recognize
    Other,
}

impl Category {
    /// All categories in declaration order. Reports are emitted in this order.
    pub const ALL: [Category; 6] = [
        Category::Audio,
        Category::Documents,
        Category::Images,
        Category::Video,
        Category::Archives,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Audio => "audio",
            Category::Documents => "documents",
            Category::Images => "images",
            Category::Video => "video",
            Category::Archives => "archives",
            Category::Other => "other",
        }
    }

    /// Whether files in this category get their names transliterated.
    ///
    /// Unrecognized files keep their original name.
    pub fn normalizes_names(&self) -> bool {
        !matches!(self, Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The built-in extension table.
pub const DEFAULT_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Audio,
        &[".mp3", ".ogg", ".wav", ".amr", ".flac", ".wma"],
    ),
    (
        Category::Documents,
        &[".docx", ".txt", ".doc", ".pdf", ".xlsx", ".pptx"],
    ),
    (Category::Images, &[".jpeg", ".png", ".jpg", ".svg"]),
    (Category::Video, &[".avi", ".mp4", ".mov", ".mkv"]),
    (Category::Archives, &[".zip", ".gz", ".tar"]),
    (Category::Other, &[]),
];

/// Returns the lowercase final suffix of a path including its dot, or an
/// empty string when there is none.
///
/// # Examples
///
/// ```
/// use clean_folder::file_category::file_extension;
/// use std::path::Path;
///
/// assert_eq!(file_extension(Path::new("song.MP3")), ".mp3");
/// assert_eq!(file_extension(Path::new("archive.tar.gz")), ".gz");
/// assert_eq!(file_extension(Path::new("Makefile")), "");
/// assert_eq!(file_extension(Path::new(".bashrc")), "");
/// ```
pub fn file_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => String::new(),
    }
}

/// Maps file extensions to categories.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a mapper from the built-in table.
    pub fn new() -> Self {
        Self::from_table(DEFAULT_TABLE)
    }

    /// Creates a mapper from an arbitrary table.
    ///
    /// Extensions are expected to be disjoint; if one is listed twice the
    /// first category that lists it wins.
    pub fn from_table(table: &[(Category, &[&str])]) -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        for (category, extensions) in table {
            for ext in *extensions {
                let key = Self::key(ext);
                mapper.extension_map.entry(key).or_insert(*category);
            }
        }
        mapper
    }

    fn key(ext: &str) -> String {
        let ext = ext.to_lowercase();
        if ext.is_empty() || ext.starts_with('.') {
            ext
        } else {
            format!(".{ext}")
        }
    }

    /// Adds or replaces an extension mapping.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(Self::key(ext), category);
    }

    /// Maps an extension (with or without leading dot) to a category.
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        if ext.is_empty() {
            return None;
        }
        self.extension_map.get(&Self::key(ext)).copied()
    }

    /// Determines the category of a file and records its extension as known
    /// or unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::{Category, FileMapper};
    /// use clean_folder::stats::StatsStore;
    /// use std::path::Path;
    ///
    /// let mapper = FileMapper::default();
    /// let stats = StatsStore::new();
    /// assert_eq!(mapper.categorize(Path::new("a/b.Jpg"), &stats), Category::Images);
    /// assert_eq!(mapper.categorize(Path::new("notes"), &stats), Category::Other);
    ///
    /// let stats = stats.into_stats();
    /// assert!(stats.known.contains(".jpg"));
    /// assert!(stats.unknown.contains(""));
    /// ```
    pub fn categorize(&self, file: &Path, stats: &StatsStore) -> Category {
        let ext = file_extension(file);
        match self.extension_to_category(&ext) {
            Some(category) => {
                stats.record_known(&ext);
                category
            }
            None => {
                stats.record_unknown(&ext);
                Category::Other
            }
        }
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}
