use crate::error::TypeError;

define_numeric_enum! {
    /// Kind of a project resource.
    ///
    /// The discriminants double as the keys of the serialized resource tree,
    /// so they must never be renumbered.
    pub enum ResourceKind {
        /// Anything the editor does not classify.
        Other = 0,
        /// The project metadata document itself (one per project).
        Meta = 1,
        /// A chart.
        Map = 2,
        Audio = 3,
        Image = 4,
        Video = 5,
        Script = 6,
    }
}

impl ResourceKind {
    /// Returns `true` for kinds that hold a single record instead of a list.
    pub fn is_singleton(self) -> bool {
        self == ResourceKind::Meta
    }
}

define_numeric_enum! {
    /// Kinds accepted for uploaded media resources.
    pub enum MediaKind {
        Audio = 3,
        Image = 4,
        Video = 5,
    }
}

impl From<MediaKind> for ResourceKind {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Audio => ResourceKind::Audio,
            MediaKind::Image => ResourceKind::Image,
            MediaKind::Video => ResourceKind::Video,
        }
    }
}

impl TryFrom<ResourceKind> for MediaKind {
    type Error = TypeError;

    fn try_from(kind: ResourceKind) -> Result<Self, Self::Error> {
        match kind {
            ResourceKind::Audio => Ok(MediaKind::Audio),
            ResourceKind::Image => Ok(MediaKind::Image),
            ResourceKind::Video => Ok(MediaKind::Video),
            other => Err(TypeError::NotMedia(other.name())),
        }
    }
}
