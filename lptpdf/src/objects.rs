//! The document-structure dictionaries a session emits at close: page tree nodes, page
//! objects, the font dictionary, the catalog and the information dictionary.

use std::io::{Error, Write};

use crate::types::{self, constants, name::Name, obj_id::ObjId, write_literal_string};

/// A `Pages` node: either the leaf listing one session's pages or the anchor linking sessions
/// together.
pub(crate) struct PageTreeNode {
    /// The anchor above this node, absent for the document root.
    pub parent: Option<ObjId>,
    pub kids: Vec<ObjId>,
    /// The number of `Page` leaves below this node, across all linked sessions.
    pub count: u64,
}

impl PageTreeNode {
    const PAGES_TYPE: Name<&'static [u8]> = Name::from_static(b"Pages");
    const PARENT: Name<&'static [u8]> = Name::from_static(b"Parent");
    const KIDS: Name<&'static [u8]> = Name::from_static(b"Kids");
    const COUNT: Name<&'static [u8]> = Name::from_static(b"Count");

    pub fn write(&self, writer: &mut dyn Write) -> Result<usize, Error> {
        let mut written = types::write_chain! {
            writer.write(b"<< "),
            Name::TYPE.write(writer),
            Self::PAGES_TYPE.write(writer),
            writer.write(constants::NL_MARKER),
        };

        if let Some(parent) = &self.parent {
            written += types::write_chain! {
                Self::PARENT.write(writer),
                parent.write_ref(writer),
                writer.write(constants::NL_MARKER),
            };
        }

        written += types::write_chain! {
            Self::KIDS.write(writer),
            writer.write(b"["),
        };
        for (index, kid) in self.kids.iter().enumerate() {
            if index > 0 {
                written += writer.write(constants::SP)?;
            }
            written += kid.write_ref(writer)?;
        }
        written += types::write_chain! {
            writer.write(b"]"),
            writer.write(constants::NL_MARKER),
            Self::COUNT.write(writer),
            writer.write(self.count.to_string().as_bytes()),
            writer.write(b" >>"),
            writer.write(constants::NL_MARKER),
        };

        Ok(written)
    }
}

/// One page leaf: geometry, its content stream and the shared resources.
pub(crate) struct PageObject {
    pub parent: ObjId,
    pub media_width: f64,
    pub media_height: f64,
    pub contents: ObjId,
    pub fonts: ObjId,
    /// The background image XObject, when an image form is active.
    pub image: Option<ObjId>,
}

impl PageObject {
    const PAGE_TYPE: Name<&'static [u8]> = Name::from_static(b"Page");
    const PARENT: Name<&'static [u8]> = Name::from_static(b"Parent");
    const MEDIA_BOX: Name<&'static [u8]> = Name::from_static(b"MediaBox");
    const CONTENTS: Name<&'static [u8]> = Name::from_static(b"Contents");
    const RESOURCES: Name<&'static [u8]> = Name::from_static(b"Resources");
    const FONT: Name<&'static [u8]> = Name::from_static(b"Font");
    const X_OBJECT: Name<&'static [u8]> = Name::from_static(b"XObject");

    pub fn write(&self, writer: &mut dyn Write) -> Result<usize, Error> {
        let mut written = types::write_chain! {
            writer.write(b"<< "),
            Name::TYPE.write(writer),
            Self::PAGE_TYPE.write(writer),
            writer.write(constants::NL_MARKER),

            Self::PARENT.write(writer),
            self.parent.write_ref(writer),
            writer.write(constants::NL_MARKER),

            Self::MEDIA_BOX.write(writer),
            writer.write(format!(
                "[0 0 {} {}]",
                types::fmt_coord(self.media_width),
                types::fmt_coord(self.media_height)
            ).as_bytes()),
            writer.write(constants::NL_MARKER),

            Self::CONTENTS.write(writer),
            self.contents.write_ref(writer),
            writer.write(constants::NL_MARKER),

            Self::RESOURCES.write(writer),
            writer.write(b"<< "),
            Self::FONT.write(writer),
            self.fonts.write_ref(writer),
            writer.write(b" "),
        };

        if let Some(image) = &self.image {
            written += types::write_chain! {
                Self::X_OBJECT.write(writer),
                writer.write(b"<< "),
                Name::from_static(crate::form::IMAGE_RESOURCE.as_bytes()).write(writer),
                image.write_ref(writer),
                writer.write(b" >> "),
            };
        }

        let procset = if self.image.is_some() {
            b"/ProcSet [/PDF /Text /ImageC]".as_slice()
        } else {
            b"/ProcSet [/PDF /Text]".as_slice()
        };
        written += types::write_chain! {
            writer.write(procset),
            writer.write(b" >> >>"),
            writer.write(constants::NL_MARKER),
        };

        Ok(written)
    }
}

/// The single font dictionary shared by every page: the text font as `F1`, the number font as
/// `F2` and the label font as `F3`.
pub(crate) struct FontDictionary<'a> {
    pub text: &'a str,
    pub number: &'a str,
    pub label: &'a str,
}

impl FontDictionary<'_> {
    const FONT_TYPE: Name<&'static [u8]> = Name::from_static(b"Font");
    const SUBTYPE: Name<&'static [u8]> = Name::from_static(b"Subtype");
    const TYPE1: Name<&'static [u8]> = Name::from_static(b"Type1");
    const BASE_FONT: Name<&'static [u8]> = Name::from_static(b"BaseFont");

    pub fn write(&self, writer: &mut dyn Write) -> Result<usize, Error> {
        let mut written = writer.write(b"<< ")?;
        for (resource, base) in [
            ("F1", self.text),
            ("F2", self.number),
            ("F3", self.label),
        ] {
            written += types::write_chain! {
                Name::new(resource.as_bytes()).write(writer),
                writer.write(b"<< "),
                Name::TYPE.write(writer),
                Self::FONT_TYPE.write(writer),
                Self::SUBTYPE.write(writer),
                Self::TYPE1.write(writer),
                Self::BASE_FONT.write(writer),
                Name::new(base.as_bytes()).write(writer),
                writer.write(b">>"),
                writer.write(constants::NL_MARKER),
            };
        }
        written += types::write_chain! {
            writer.write(b">>"),
            writer.write(constants::NL_MARKER),
        };
        Ok(written)
    }
}

/// The document catalog.
pub(crate) struct Catalog {
    pub root_page_tree: ObjId,
}

impl Catalog {
    const CATALOG: Name<&'static [u8]> = Name::from_static(b"Catalog");
    const PAGES: Name<&'static [u8]> = Name::from_static(b"Pages");

    pub fn write(&self, writer: &mut dyn Write) -> Result<usize, Error> {
        let written = types::write_chain! {
            writer.write(b"<< "),

            Name::TYPE.write(writer),
            Self::CATALOG.write(writer),
            writer.write(constants::NL_MARKER),

            Self::PAGES.write(writer),
            self.root_page_tree.write_ref(writer),

            writer.write(b" >>"),
            writer.write(constants::NL_MARKER),
        };

        Ok(written)
    }
}

/// The document information dictionary.
pub(crate) struct InfoDictionary<'a> {
    pub title: &'a str,
    pub creator: Option<&'a str>,
    pub producer: &'a str,
    pub creation_date: &'a str,
    pub mod_date: &'a str,
}

impl InfoDictionary<'_> {
    const TITLE: Name<&'static [u8]> = Name::from_static(b"Title");
    const CREATOR: Name<&'static [u8]> = Name::from_static(b"Creator");
    const PRODUCER: Name<&'static [u8]> = Name::from_static(b"Producer");
    const CREATION_DATE: Name<&'static [u8]> = Name::from_static(b"CreationDate");
    const MOD_DATE: Name<&'static [u8]> = Name::from_static(b"ModDate");

    pub fn write(&self, writer: &mut dyn Write) -> Result<usize, Error> {
        let mut written = types::write_chain! {
            writer.write(b"<< "),
            Self::TITLE.write(writer),
            write_literal_string(writer, self.title.as_bytes()),
            writer.write(constants::NL_MARKER),
        };

        if let Some(creator) = self.creator {
            written += types::write_chain! {
                Self::CREATOR.write(writer),
                write_literal_string(writer, creator.as_bytes()),
                writer.write(constants::NL_MARKER),
            };
        }

        written += types::write_chain! {
            Self::PRODUCER.write(writer),
            write_literal_string(writer, self.producer.as_bytes()),
            writer.write(constants::NL_MARKER),

            Self::CREATION_DATE.write(writer),
            write_literal_string(writer, self.creation_date.as_bytes()),
            writer.write(constants::NL_MARKER),

            Self::MOD_DATE.write(writer),
            write_literal_string(writer, self.mod_date.as_bytes()),
            writer.write(b" >>"),
            writer.write(constants::NL_MARKER),
        };

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, FontDictionary, InfoDictionary, PageObject, PageTreeNode};
    use crate::types::obj_id::ObjId;

    #[test]
    fn page_tree_leaf() {
        let leaf = PageTreeNode {
            parent: Some(ObjId::new(5)),
            kids: Vec::from([ObjId::new(4)]),
            count: 1,
        };

        let mut writer = Vec::new();
        let written = leaf.write(&mut writer).unwrap();
        let output = String::from_utf8(writer).unwrap();

        assert_eq!(
            output,
            "<< /Type /Pages \n/Parent 5 0 R\n/Kids [4 0 R]\n/Count 1 >>\n"
        );
        assert_eq!(written, output.len());
    }

    #[test]
    fn anchor_without_parent() {
        let anchor = PageTreeNode {
            parent: None,
            kids: Vec::from([ObjId::new(2), ObjId::new(9)]),
            count: 3,
        };

        let mut writer = Vec::new();
        anchor.write(&mut writer).unwrap();
        let output = String::from_utf8(writer).unwrap();

        assert_eq!(
            output,
            "<< /Type /Pages \n/Kids [2 0 R 9 0 R]\n/Count 3 >>\n"
        );
    }

    #[test]
    fn simple_catalog() {
        let catalog = Catalog {
            root_page_tree: ObjId::new(10),
        };

        let mut writer = Vec::default();
        catalog.write(&mut writer).unwrap();
        let output = String::from_utf8(writer).unwrap();

        assert_eq!(output, "<< /Type /Catalog \n/Pages 10 0 R >>\n");
    }

    #[test]
    fn page_with_image_resource() {
        let page = PageObject {
            parent: ObjId::new(2),
            media_width: 1071.0,
            media_height: 792.0,
            contents: ObjId::new(1),
            fonts: ObjId::new(3),
            image: Some(ObjId::new(7)),
        };

        let mut writer = Vec::new();
        page.write(&mut writer).unwrap();
        let output = String::from_utf8(writer).unwrap();

        assert!(output.contains("/MediaBox [0 0 1071 792]"));
        assert!(output.contains("/Contents 1 0 R"));
        assert!(output.contains("/Font 3 0 R"));
        assert!(output.contains("/XObject << /Bg 7 0 R >>"));
        assert!(output.contains("/ProcSet [/PDF /Text /ImageC]"));
    }

    #[test]
    fn font_dictionary_lists_all_three_roles() {
        let fonts = FontDictionary {
            text: "Courier",
            number: "Times-Roman",
            label: "Times-Bold",
        };

        let mut writer = Vec::new();
        fonts.write(&mut writer).unwrap();
        let output = String::from_utf8(writer).unwrap();

        assert!(output.contains("/F1 << /Type /Font /Subtype /Type1 /BaseFont /Courier >>"));
        assert!(output.contains("/F2 << /Type /Font /Subtype /Type1 /BaseFont /Times-Roman >>"));
        assert!(output.contains("/F3 << /Type /Font /Subtype /Type1 /BaseFont /Times-Bold >>"));
    }

    #[test]
    fn info_dictionary_escapes_the_title() {
        let info = InfoDictionary {
            title: "budget (draft)",
            creator: None,
            producer: "LPTPDF 0.1.0",
            creation_date: "D:20260801120000Z",
            mod_date: "D:20260801120000Z",
        };

        let mut writer = Vec::new();
        info.write(&mut writer).unwrap();
        let output = String::from_utf8(writer).unwrap();

        assert!(output.contains("/Title (budget \\(draft\\))"));
        assert!(output.contains("/Producer (LPTPDF 0.1.0)"));
        assert!(output.contains("/CreationDate (D:20260801120000Z)"));
    }
}
