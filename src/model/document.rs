// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! JSON document mapping for collections.
//!
//! A collection is written as an object whose keys are mood names, in mood
//! order, and whose values are arrays of song names. This is the per-user
//! shape used by every storage backend and by the JSON export.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
};

use crate::model::Collection;

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.moods().iter().map(|m| (m.name(), m.songs())))
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionVisitor)
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = Collection;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of mood names to lists of song names")
    }

    // Entries go through the normal insert path so a stored record can never
    // bypass the naming rules.
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut collection = Collection::new();

        while let Some((mood, songs)) = access.next_entry::<String, Vec<String>>()? {
            collection.create_mood(&mood).map_err(de::Error::custom)?;
            for song in songs {
                collection.add_song(&mood, &song).map_err(de::Error::custom)?;
            }
        }

        Ok(collection)
    }
}
