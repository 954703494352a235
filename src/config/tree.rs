//! Encoding typed values into merge trees.
//!
//! Works like `serde_json::to_value`, except that every enum variant keeps
//! its tag under [`VARIANT_KEY`]. A later layer that picks another variant
//! can then be told apart from a map gaining a key. [`untag_variants`]
//! restores the externally tagged shape `serde_json` decodes.

use serde::Serialize;
use serde::ser;
use serde_json::{Error, Map, Value};

/// Reserved key holding the variant name of an encoded enum value.
pub(crate) const VARIANT_KEY: &str = "\u{0}variant";

/// Encode `value` into a tree with tagged enum variants.
pub(crate) fn to_tree<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
    value.serialize(TreeSerializer)
}

/// Variant name of an encoded enum value.
pub(crate) fn variant(value: &Value) -> Option<&str> {
    value.as_object()?.get(VARIANT_KEY)?.as_str()
}

/// Turn tagged variants back into `"Name"` or `{"Name": inner}`.
pub(crate) fn untag_variants(value: &mut Value) {
    let untagged = match value {
        Value::Array(items) => {
            items.iter_mut().for_each(untag_variants);
            return;
        }
        Value::Object(map) => match map.remove(VARIANT_KEY) {
            Some(Value::String(name)) => match map.remove(&name) {
                Some(mut inner) => {
                    untag_variants(&mut inner);
                    let mut tagged = Map::new();
                    tagged.insert(name, inner);
                    Value::Object(tagged)
                }
                None => Value::String(name),
            },
            _ => {
                map.values_mut().for_each(untag_variants);
                return;
            }
        },
        _ => return,
    };
    *value = untagged;
}

fn tagged(variant: &'static str, inner: Option<Value>) -> Value {
    let mut map = Map::new();
    map.insert(VARIANT_KEY.to_string(), Value::String(variant.to_string()));
    if let Some(inner) = inner {
        map.insert(variant.to_string(), inner);
    }
    Value::Object(map)
}

fn map_key<T: Serialize + ?Sized>(key: &T) -> Result<String, Error> {
    match serde_json::to_value(key)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(<Error as ser::Error>::custom("key must be a string")),
    }
}

struct TreeSerializer;

impl ser::Serializer for TreeSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantBuilder<SeqBuilder>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = VariantBuilder<MapBuilder>;

    fn serialize_bool(self, v: bool) -> Result<Value, Error> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Value, Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Value, Error> {
        self.serialize_i64(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Value, Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Value, Error> {
        self.serialize_u64(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, Error> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, Error> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, Error> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, Error> {
        Ok(Value::Array(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, Error> {
        Ok(tagged(variant, None))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, Error> {
        Ok(tagged(variant, Some(to_tree(value)?)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, Error> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<SeqBuilder>, Error> {
        Ok(VariantBuilder {
            variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapBuilder, Error> {
        Ok(MapBuilder::default())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<MapBuilder, Error> {
        Ok(MapBuilder::default())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantBuilder<MapBuilder>, Error> {
        Ok(VariantBuilder {
            variant,
            inner: MapBuilder::default(),
        })
    }
}

struct SeqBuilder {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.items.push(to_tree(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, Error> {
        ser::SerializeSeq::end(self)
    }
}

#[derive(Default)]
struct MapBuilder {
    map: Map<String, Value>,
    key: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Error> {
        self.key = Some(map_key(key)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let key = self
            .key
            .take()
            .ok_or_else(|| <Error as ser::Error>::custom("map value without a key"))?;
        self.map.insert(key, to_tree(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        self.map.insert(key.to_string(), to_tree(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, Error> {
        Ok(Value::Object(self.map))
    }
}

struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

impl ser::SerializeTupleVariant for VariantBuilder<SeqBuilder> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Value, Error> {
        let inner = ser::SerializeSeq::end(self.inner)?;
        Ok(tagged(self.variant, Some(inner)))
    }
}

impl ser::SerializeStructVariant for VariantBuilder<MapBuilder> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Value, Error> {
        let inner = ser::SerializeStruct::end(self.inner)?;
        Ok(tagged(self.variant, Some(inner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    enum Mode {
        Off,
        Level(u8),
        Pair(u8, u8),
        Custom { level: u8 },
    }

    #[derive(Serialize)]
    struct Plain {
        name: String,
        ports: Vec<u16>,
        labels: BTreeMap<u8, String>,
    }

    #[test]
    fn test_plain_values_match_serde_json() {
        let plain = Plain {
            name: "app".into(),
            ports: vec![80, 443],
            labels: BTreeMap::from([(1, "one".to_string())]),
        };
        assert_eq!(to_tree(&plain).unwrap(), serde_json::to_value(&plain).unwrap());
        assert_eq!(to_tree(&Some(1.5)).unwrap(), json!(1.5));
        assert_eq!(to_tree(&None::<u8>).unwrap(), Value::Null);
    }

    #[test]
    fn test_variants_are_tagged() {
        let unit = to_tree(&Mode::Off).unwrap();
        assert_eq!(variant(&unit), Some("Off"));
        let custom = to_tree(&Mode::Custom { level: 3 }).unwrap();
        assert_eq!(variant(&custom), Some("Custom"));
        assert_eq!(custom["Custom"], json!({"level": 3}));
        assert_eq!(variant(&json!({"Off": null})), None);
    }

    #[test]
    fn test_untag_restores_external_tagging() {
        for mode in [
            Mode::Off,
            Mode::Level(2),
            Mode::Pair(1, 2),
            Mode::Custom { level: 3 },
        ] {
            let nested = BTreeMap::from([("modes", vec![mode])]);
            let mut tree = to_tree(&nested).unwrap();
            untag_variants(&mut tree);
            assert_eq!(tree, serde_json::to_value(&nested).unwrap());
        }
    }
}
