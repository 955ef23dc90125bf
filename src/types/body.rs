//! BODYSTRUCTURE data.
//!
//! A BODYSTRUCTURE is a tree: multiparts nest further body structures,
//! single parts carry per-media fields. Extension data hangs off either
//! kind as an optional suffix chain (md5/disposition/language/location),
//! mirroring how the wire format appends optional fields in order.

use crate::types::{
    core::{IString, NString, Vec1},
    envelope::Envelope,
};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum BodyStructure {
    /// `body-type-1part`
    Single {
        body: Body,
        /// `body-ext-1part`
        extension_data: Option<SinglePartExtension>,
    },
    /// `body-type-mpart`
    Multi {
        bodies: Vec1<BodyStructure>,
        subtype: IString,
        /// `body-ext-mpart`
        extension_data: Option<MultiPartExtension>,
    },
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Body {
    pub basic: BasicFields,
    pub specific: SpecificFields,
}

/// `body-fields = body-fld-param SP body-fld-id SP body-fld-desc SP
///                body-fld-enc SP body-fld-octets`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BasicFields {
    pub parameter_list: Vec<(IString, IString)>,
    pub id: NString,
    pub description: NString,
    pub content_transfer_encoding: IString,
    pub size: u32,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SpecificFields {
    /// `body-type-basic`
    Basic { r#type: IString, subtype: IString },
    /// `body-type-msg`: a `MESSAGE/RFC822` part embeds the envelope and
    /// structure of the enclosed message.
    Message {
        envelope: Box<Envelope>,
        body_structure: Box<BodyStructure>,
        number_of_lines: u32,
    },
    /// `body-type-text`
    Text {
        subtype: IString,
        number_of_lines: u32,
    },
}

/// `body-ext-1part = body-fld-md5 [SP body-fld-dsp [SP body-fld-lang [SP body-fld-loc *(SP body-extension)]]]`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SinglePartExtension {
    pub md5: NString,
    pub tail: Option<Disposition>,
}

/// `body-ext-mpart = body-fld-param [SP body-fld-dsp [SP body-fld-lang [SP body-fld-loc *(SP body-extension)]]]`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MultiPartExtension {
    pub parameter_list: Vec<(IString, IString)>,
    pub tail: Option<Disposition>,
}

/// `body-fld-dsp = "(" string SP body-fld-param ")" / nil`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Disposition {
    pub disposition: Option<(IString, Vec<(IString, IString)>)>,
    pub tail: Option<Language>,
}

/// `body-fld-lang = nstring / "(" string *(SP string) ")"`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Language {
    pub languages: Vec<IString>,
    pub tail: Option<Location>,
}

/// `body-fld-loc = nstring`, followed by any future extension values.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Location {
    pub location: NString,
    pub extensions: Vec<BodyExtension>,
}

/// `body-extension = nstring / number / "(" body-extension *(SP body-extension) ")"`
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum BodyExtension {
    NString(NString),
    Number(u32),
    List(Vec1<BodyExtension>),
}
