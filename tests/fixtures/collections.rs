use crate::entities::{contents, uploaded_files};

macro_rules! embeddable_entity {
    ($entity:ty, $column:ty, $primary_key:expr, $user_id:expr) => {};
}

embeddable_entity!(
    contents::Entity,
    contents::Column,
    contents::Column::Id,
    None
);

embeddable_entity!(
    uploaded_files::Entity,
    uploaded_files::Column,
    uploaded_files::Column::Id,
    Some(uploaded_files::Column::UserId)
);

// registered twice on purpose
embeddable_entity!(contents::Entity, contents::Column, contents::Column::Id, None);
