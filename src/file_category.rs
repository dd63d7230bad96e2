/// Extension-based file categorization.
///
/// Files are sorted into five fixed categories by their extension. The lookup
/// is exact and case-insensitive (extensions are normalized to uppercase), and
/// the table cannot be changed at runtime.
///
/// # Examples
///
/// ```
/// use dirsort::file_category::{Category, FileMapper};
///
/// let mapper = FileMapper::default();
/// assert_eq!(mapper.classify("jpg"), Some(Category::Images));
/// assert_eq!(mapper.classify("Mp3"), Some(Category::Audio));
/// assert_eq!(mapper.classify("exe"), None);
/// ```
use std::collections::{BTreeSet, HashMap};

/// One of the five result folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// JPEG, PNG, JPG, SVG
    Images,
    /// AVI, MP4, MOV, MKV
    Video,
    /// DOC, DOCX, TXT, PDF, XLXS, PPTX
    Documents,
    /// MP3, OGG, WAV, AMR
    Audio,
    /// ZIP, GZ, TAR
    Archives,
}

/// Extension lists, positionally aligned with [`Category::ALL`].
const EXTENSION_TABLE: [&[&str]; 5] = [
    &["JPEG", "PNG", "JPG", "SVG"],
    &["AVI", "MP4", "MOV", "MKV"],
    &["DOC", "DOCX", "TXT", "PDF", "XLXS", "PPTX"],
    &["MP3", "OGG", "WAV", "AMR"],
    &["ZIP", "GZ", "TAR"],
];

impl Category {
    /// All categories in table order.
    pub const ALL: [Category; 5] = [
        Category::Images,
        Category::Video,
        Category::Documents,
        Category::Audio,
        Category::Archives,
    ];

    /// Returns the result folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Video.dir_name(), "video");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Video => "video",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Archives => "archives",
        }
    }

    /// Whether `name` is one of the five result folder names.
    ///
    /// Source directories with these names are never descended into.
    pub fn is_reserved_dir_name(name: &str) -> bool {
        Self::ALL.iter().any(|category| category.dir_name() == name)
    }
}

/// Maps uppercase extensions to categories.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<&'static str, Category>,
}

impl FileMapper {
    /// Builds the mapper from the fixed extension table.
    pub fn new() -> Self {
        let extension_map = Category::ALL
            .iter()
            .zip(EXTENSION_TABLE.iter())
            .flat_map(|(category, extensions)| {
                extensions.iter().map(move |ext| (*ext, *category))
            })
            .collect();

        Self { extension_map }
    }

    /// Returns the category for an extension (without the leading dot), or
    /// `None` when it is unknown.
    pub fn classify(&self, ext: &str) -> Option<Category> {
        self.extension_map
            .get(ext.to_uppercase().as_str())
            .copied()
    }

    /// Classifies an extension and records it as known or unknown.
    ///
    /// Empty extensions are classified as unknown but not recorded.
    pub fn classify_and_record(&self, ext: &str, report: &mut ExtensionReport) -> Option<Category> {
        let category = self.classify(ext);
        if !ext.is_empty() {
            report.record(ext, category.is_some());
        }
        category
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Extensions observed during one run, split by whether they were recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionReport {
    pub known: BTreeSet<String>,
    pub unknown: BTreeSet<String>,
}

impl ExtensionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an extension, normalized to uppercase.
    pub fn record(&mut self, ext: &str, known: bool) {
        let ext = ext.to_uppercase();
        if known {
            self.known.insert(ext);
        } else {
            self.unknown.insert(ext);
        }
    }
}
