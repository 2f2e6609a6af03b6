pub mod catalog;
pub mod quiz;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Reference,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
            Level::Reference => "reference",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub slug: &'static str,
}

#[derive(Debug)]
pub struct Chapter {
    pub id: &'static str,
    pub number: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub level: Level,
    pub sections: &'static [Section],
}

impl Chapter {
    pub fn section(&self, section_id: &str) -> Option<&'static Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Full ids of every section in this chapter, in order.
    pub fn full_ids(&self) -> Vec<String> {
        self.sections
            .iter()
            .map(|s| section_full_id(self.id, s.id))
            .collect()
    }
}

/// A position in the curriculum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionRef {
    pub chapter_id: &'static str,
    pub section_id: &'static str,
}

impl SectionRef {
    pub fn full_id(&self) -> String {
        section_full_id(self.chapter_id, self.section_id)
    }
}

/// Read-only view over an ordered list of chapters. Array order is
/// curriculum order for both chapters and sections.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    chapters: &'static [Chapter],
}

impl Catalog {
    pub const fn new(chapters: &'static [Chapter]) -> Self {
        Self { chapters }
    }

    pub const fn builtin() -> Self {
        Self::new(catalog::CHAPTERS)
    }

    pub fn chapters(&self) -> &'static [Chapter] {
        self.chapters
    }

    pub fn chapter_by_id(&self, chapter_id: &str) -> Option<&'static Chapter> {
        self.chapters.iter().find(|c| c.id == chapter_id)
    }

    pub fn find_section(
        &self,
        chapter_id: &str,
        section_id: &str,
    ) -> Option<(&'static Chapter, &'static Section)> {
        let chapter = self.chapter_by_id(chapter_id)?;
        let section = chapter.section(section_id)?;
        Some((chapter, section))
    }

    pub fn total_section_count(&self) -> usize {
        self.chapters.iter().map(|c| c.sections.len()).sum()
    }

    /// The section after `(chapter_id, section_id)`, crossing into the next
    /// chapter when needed.
    ///
    /// A section id that does not exist in the chapter is treated as sitting
    /// before the first section, so the chapter's first section comes back.
    pub fn next_section(&self, chapter_id: &str, section_id: &str) -> Option<SectionRef> {
        let (chapter_index, section_index) = self.locate(chapter_id, section_id)?;
        let chapter = &self.chapters[chapter_index];

        if section_index < chapter.sections.len() as isize - 1 {
            let next = &chapter.sections[(section_index + 1) as usize];
            return Some(SectionRef {
                chapter_id: chapter.id,
                section_id: next.id,
            });
        }

        let next_chapter = self.chapters.get(chapter_index + 1)?;
        next_chapter.sections.first().map(|s| SectionRef {
            chapter_id: next_chapter.id,
            section_id: s.id,
        })
    }

    /// The section before `(chapter_id, section_id)`, crossing into the
    /// previous chapter's last section when needed.
    pub fn prev_section(&self, chapter_id: &str, section_id: &str) -> Option<SectionRef> {
        let (chapter_index, section_index) = self.locate(chapter_id, section_id)?;
        let chapter = &self.chapters[chapter_index];

        if section_index > 0 {
            let prev = &chapter.sections[(section_index - 1) as usize];
            return Some(SectionRef {
                chapter_id: chapter.id,
                section_id: prev.id,
            });
        }

        let prev_chapter = self.chapters.get(chapter_index.checked_sub(1)?)?;
        prev_chapter.sections.last().map(|s| SectionRef {
            chapter_id: prev_chapter.id,
            section_id: s.id,
        })
    }

    /// Chapter position plus section position, with -1 for an unknown section.
    fn locate(&self, chapter_id: &str, section_id: &str) -> Option<(usize, isize)> {
        let chapter_index = self.chapters.iter().position(|c| c.id == chapter_id)?;
        let section_index = self.chapters[chapter_index]
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .map_or(-1, |i| i as isize);
        Some((chapter_index, section_index))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `"chapter/section"`. No validation: empty parts give `"/"`.
pub fn section_full_id(chapter_id: &str, section_id: &str) -> String {
    format!("{chapter_id}/{section_id}")
}

pub fn parse_full_id(full_id: &str) -> Option<(&str, &str)> {
    full_id.split_once('/')
}

/// Ids coming from the outside (command line, imported data) must be
/// non-empty and made of `[a-z0-9-]` only.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_A: &[Section] = &[
        Section {
            id: "s1",
            title: "A1",
            slug: "a1",
        },
        Section {
            id: "s2",
            title: "A2",
            slug: "a2",
        },
    ];

    const TINY_C: &[Section] = &[Section {
        id: "s1",
        title: "C1",
        slug: "c1",
    }];

    const TINY: &[Chapter] = &[
        Chapter {
            id: "a",
            number: 1,
            title: "A",
            description: "",
            level: Level::Beginner,
            sections: TINY_A,
        },
        Chapter {
            id: "b",
            number: 2,
            title: "B",
            description: "",
            level: Level::Beginner,
            sections: &[],
        },
        Chapter {
            id: "c",
            number: 3,
            title: "C",
            description: "",
            level: Level::Reference,
            sections: TINY_C,
        },
    ];

    fn at(chapter_id: &'static str, section_id: &'static str) -> SectionRef {
        SectionRef {
            chapter_id,
            section_id,
        }
    }

    #[test]
    fn test_builtin_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.chapters().len(), 11);
        assert_eq!(catalog.total_section_count(), 69);
        for (i, chapter) in catalog.chapters().iter().enumerate() {
            assert_eq!(chapter.number as usize, i + 1, "{}", chapter.id);
            assert!(!chapter.sections.is_empty(), "{}", chapter.id);
        }
    }

    #[test]
    fn test_chapter_by_id() {
        let catalog = Catalog::builtin();
        let chapter = catalog.chapter_by_id("chapter-04").unwrap();
        assert_eq!(chapter.number, 4);
        assert_eq!(chapter.level, Level::Intermediate);
        assert!(catalog.chapter_by_id("chapter-99").is_none());
        assert!(catalog.chapter_by_id("").is_none());
    }

    #[test]
    fn test_section_full_id_is_plain_join() {
        assert_eq!(
            section_full_id("chapter-01", "section-01"),
            "chapter-01/section-01"
        );
        assert_eq!(section_full_id("", ""), "/");
        assert_eq!(parse_full_id("chapter-01/section-02"), Some(("chapter-01", "section-02")));
        assert_eq!(parse_full_id("chapter-01"), None);
    }

    #[test]
    fn test_next_within_and_across_chapters() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.next_section("chapter-01", "section-01"),
            Some(at("chapter-01", "section-02"))
        );
        assert_eq!(
            catalog.next_section("chapter-01", "section-06"),
            Some(at("chapter-02", "section-01"))
        );
        assert_eq!(catalog.next_section("chapter-11", "section-06"), None);
        assert_eq!(catalog.next_section("chapter-99", "section-01"), None);
    }

    #[test]
    fn test_prev_within_and_across_chapters() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.prev_section("chapter-02", "section-01"),
            Some(at("chapter-01", "section-06"))
        );
        assert_eq!(
            catalog.prev_section("chapter-02", "section-03"),
            Some(at("chapter-02", "section-02"))
        );
        assert_eq!(catalog.prev_section("chapter-01", "section-01"), None);
    }

    #[test]
    fn test_unknown_section_is_treated_as_before_first() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.next_section("chapter-03", "section-99"),
            Some(at("chapter-03", "section-01"))
        );
        assert_eq!(
            catalog.prev_section("chapter-03", "section-99"),
            Some(at("chapter-02", "section-07"))
        );
        assert_eq!(catalog.prev_section("chapter-01", "nope"), None);
    }

    #[test]
    fn test_next_and_prev_are_inverse_over_builtin() {
        let catalog = Catalog::builtin();
        let mut visited = 0;
        for chapter in catalog.chapters() {
            for section in chapter.sections {
                if let Some(next) = catalog.next_section(chapter.id, section.id) {
                    let back = catalog
                        .prev_section(next.chapter_id, next.section_id)
                        .unwrap();
                    assert_eq!(back, at(chapter.id, section.id));
                    visited += 1;
                }
            }
        }
        assert_eq!(visited, catalog.total_section_count() - 1);
    }

    #[test]
    fn test_empty_neighbour_chapter_stops_traversal() {
        let catalog = Catalog::new(TINY);
        assert_eq!(catalog.next_section("a", "s2"), None);
        assert_eq!(catalog.prev_section("c", "s1"), None);
        assert_eq!(catalog.next_section("b", "s1"), Some(at("c", "s1")));
        assert_eq!(catalog.prev_section("b", "s1"), Some(at("a", "s2")));
        assert_eq!(catalog.total_section_count(), 3);
    }

    #[test]
    fn test_find_section_and_full_ids() {
        let catalog = Catalog::builtin();
        let (chapter, section) = catalog.find_section("chapter-05", "section-02").unwrap();
        assert_eq!(chapter.id, "chapter-05");
        assert_eq!(section.slug, "network-types");
        assert!(catalog.find_section("chapter-05", "section-99").is_none());

        let ids = catalog.chapter_by_id("chapter-09").unwrap().full_ids();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids[0], "chapter-09/section-01");
        assert_eq!(at("chapter-09", "section-05").full_id(), ids[4]);
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("chapter-01"));
        assert!(is_valid_id("section-7"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id("Chapter-01"));
        assert!(!is_valid_id("chapter_01"));
        assert!(!is_valid_id("chapter-01/section-01"));
        assert!(!is_valid_id("ｃhapter"));
    }
}
