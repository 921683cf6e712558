//! Section taxonomy.
//!
//! Every section of a book belongs to one of four structural types, and front
//! and back matter additionally carry an editorial subtype. The subtype names
//! double as CSS classes in the generated markup, so each variant knows its
//! own tag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural type of a section; also the filename prefix of its output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    FrontMatter,
    Part,
    Chapter,
    BackMatter,
    /// Free-standing markup that is not part of the book tree (custom
    /// copyright text, for instance).
    Custom,
}

impl SectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FrontMatter => "front-matter",
            Self::Part => "part",
            Self::Chapter => "chapter",
            Self::BackMatter => "back-matter",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! taxonomy {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $tag:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            $($variant,)+
            #[default]
            Miscellaneous,
        }

        impl $name {
            /// Parse a taxonomy tag. Unknown tags fall back to `Miscellaneous`.
            pub fn from_tag(tag: &str) -> Self {
                match tag.trim().to_ascii_lowercase().as_str() {
                    $($tag => Self::$variant,)+
                    _ => Self::Miscellaneous,
                }
            }

            /// The tag, which is also the CSS class used in generated markup.
            pub fn tag(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                    Self::Miscellaneous => "miscellaneous",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.tag())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.tag())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let tag = String::deserialize(deserializer)?;
                Ok(Self::from_tag(&tag))
            }
        }
    };
}

taxonomy! {
    /// Editorial subtype of a front-matter section.
    FrontMatterType {
        Abstract => "abstract",
        Acknowledgements => "acknowledgements",
        BeforeTitle => "before-title",
        Chronology => "chronology",
        Dedication => "dedication",
        Disclaimer => "disclaimer",
        Epigraph => "epigraph",
        Foreword => "foreword",
        Genealogy => "genealogy",
        Introduction => "introduction",
        ListOfAbbreviations => "list-of-abbreviations",
        ListOfCharacters => "list-of-characters",
        ListOfIllustrations => "list-of-illustrations",
        ListOfTables => "list-of-tables",
        OtherBooks => "other-books",
        Preface => "preface",
        Prologue => "prologue",
        TitlePage => "title-page",
    }
}

taxonomy! {
    /// Editorial subtype of a back-matter section.
    BackMatterType {
        Acknowledgements => "acknowledgements",
        Afterword => "afterword",
        Appendix => "appendix",
        Authors => "authors",
        Bibliography => "bibliography",
        BiographicalNote => "biographical-note",
        Chronology => "chronology",
        Colophon => "colophon",
        Conclusion => "conclusion",
        Credits => "credits",
        Dedication => "dedication",
        Disclaimer => "disclaimer",
        Epilogue => "epilogue",
        Errata => "errata",
        Glossary => "glossary",
        Index => "index",
        ListOfAbbreviations => "list-of-abbreviations",
        Notes => "notes",
        OtherBooks => "other-books",
        Permissions => "permissions",
        ReadingGroupGuide => "reading-group-guide",
        Resources => "resources",
        Sources => "sources",
        SuggestedReading => "suggested-reading",
    }
}

impl FrontMatterType {
    /// Dedication and epigraph are pulled ahead of all other front matter.
    pub fn leads_front_matter(self) -> bool {
        matches!(self, Self::Dedication | Self::Epigraph)
    }

    /// Subtypes rendered by a dedicated renderer rather than the generic
    /// front-matter pass.
    pub fn has_own_renderer(self) -> bool {
        matches!(self, Self::Dedication | Self::Epigraph | Self::TitlePage)
    }
}
