use std::fmt;

use itertools::Itertools;
use serde::{Deserializer, de};

/// Custom deserializer for Option<Vec<String>> fields that may arrive as a
/// single string (environment variables). Entries split on newlines or commas,
/// are trimmed, and keep their first occurrence only.
pub fn deserialize_opt_vec_from_string<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct VecStringVisitor;

    impl<'de> de::Visitor<'de> for VecStringVisitor {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a sequence of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let entries: Vec<String> = value
                .split(['\n', ','])
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unique()
                .collect();

            if entries.is_empty() {
                Ok(None)
            } else {
                Ok(Some(entries))
            }
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut vec: Vec<String> = Vec::new();
            while let Some(element) = seq.next_element::<String>()? {
                vec.push(element);
            }
            let vec: Vec<String> = vec.into_iter().unique().collect();
            if vec.is_empty() { Ok(None) } else { Ok(Some(vec)) }
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(VecStringVisitor)
}
