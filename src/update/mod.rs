//! Update application for MongoDB-style update documents.
//!
//! An update is either a whole-document replacement or a list of operators
//! (`$set`, `$unset`, `$rename`, `$setOnInsert`, `$inc`, `$mul`, `$pull`,
//! `$addToSet`). The mode is fixed when the [`UpdateApplier`] is built.

mod apply;
mod parse;
mod types;

pub use apply::{apply_replace, apply_step};
pub use parse::compile_update;
pub use types::{UpdateMode, UpdateOperator, UpdateOptions, UpdateStep};

use bson::{Bson, Document};

use crate::errors::DocError;

/// A classified update, reusable across any number of documents.
#[derive(Debug, Clone)]
pub struct UpdateApplier {
    mode: UpdateMode,
    options: UpdateOptions,
}

impl UpdateApplier {
    /// # Errors
    /// `MixedUpdateModes`, `UnknownOperator` or `MalformedOperator` when the
    /// update is not valid.
    pub fn new(update: &Document, options: UpdateOptions) -> Result<Self, DocError> {
        let mode = compile_update(update)?;
        log::debug!(
            "update classified as {} ({} top-level keys)",
            if matches!(mode, UpdateMode::Operators(_)) { "operators" } else { "replace" },
            update.len()
        );
        Ok(Self { mode, options })
    }

    /// Build from an arbitrary value; only a document is a usable update.
    ///
    /// # Errors
    /// `EmptyOrMissingUpdate` for null or non-document values, otherwise as [`UpdateApplier::new`].
    pub fn from_bson(update: &Bson, options: UpdateOptions) -> Result<Self, DocError> {
        match update {
            Bson::Document(d) => Self::new(d, options),
            _ => Err(DocError::EmptyOrMissingUpdate),
        }
    }

    /// # Errors
    /// Returns an error if the JSON cannot be parsed or the update is not valid.
    pub fn from_json(json: &str, options: UpdateOptions) -> Result<Self, DocError> {
        let value: Bson = serde_json::from_str(json)?;
        Self::from_bson(&value, options)
    }

    #[must_use]
    pub const fn is_operator_update(&self) -> bool {
        matches!(self.mode, UpdateMode::Operators(_))
    }

    #[must_use]
    pub const fn options(&self) -> UpdateOptions {
        self.options
    }

    #[must_use]
    pub const fn mode(&self) -> &UpdateMode {
        &self.mode
    }

    /// Apply the update to `doc` and return the resulting document.
    ///
    /// In operator mode the document is mutated in place, operator by
    /// operator in the update's key order, and handed back.
    ///
    /// # Errors
    /// `IllegalMultiUpsertReplace` for a replace in upsert + multi mode on a
    /// document without `_id`.
    pub fn apply(&self, mut doc: Document) -> Result<Document, DocError> {
        match &self.mode {
            UpdateMode::Replace(replacement) => apply_replace(replacement, &doc, self.options),
            UpdateMode::Operators(steps) => {
                for step in steps {
                    log::trace!("applying {step:?}");
                    apply_step(step, &mut doc, self.options);
                }
                Ok(doc)
            }
        }
    }
}

/// # Errors
/// Returns an error if the JSON cannot be parsed or the update is not valid.
pub fn parse_update_json(json: &str, options: UpdateOptions) -> Result<UpdateApplier, DocError> {
    UpdateApplier::from_json(json, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    fn apply(update: Document, doc: Document) -> Document {
        UpdateApplier::new(&update, UpdateOptions::default())
            .and_then(|u| u.apply(doc))
            .unwrap_or_else(|e| panic!("update failed: {e}"))
    }

    #[test]
    fn missing_update_is_rejected() {
        assert!(matches!(
            UpdateApplier::from_bson(&Bson::Null, UpdateOptions::default()),
            Err(DocError::EmptyOrMissingUpdate)
        ));
        assert!(matches!(
            UpdateApplier::from_json("null", UpdateOptions::default()),
            Err(DocError::EmptyOrMissingUpdate)
        ));
        assert!(UpdateApplier::from_bson(&Bson::Document(doc! {}), UpdateOptions::default()).is_ok());
    }

    #[test]
    fn is_operator_update_reports_mode() {
        let ops = UpdateApplier::new(&doc! {"$set": {"a": 1, "b": 5}}, UpdateOptions::default());
        assert_eq!(ops.map(|u| u.is_operator_update()).ok(), Some(true));
        let plain = UpdateApplier::new(&doc! {"a": 5, "b": 3}, UpdateOptions::default());
        assert_eq!(plain.map(|u| u.is_operator_update()).ok(), Some(false));
    }

    #[test]
    fn operator_mode_scenario() {
        let out = apply(
            doc! {
                "$set": {"a": 6, "d": [1, 2, 3]},
                "$unset": {"b": "", "c.d": ""},
                "$rename": {"c": "f"},
                "$inc": {"x.y.z": 5},
            },
            doc! {"a": 5, "b": 7, "c": {"d": 8}},
        );
        assert_eq!(out, doc! {"a": 6, "d": [1, 2, 3], "f": {}, "x": {"y": {"z": 5}}});
    }

    #[test]
    fn replace_mode_copies_update_and_keeps_old_id() {
        let old = ObjectId::new();
        let new = ObjectId::new();
        let out = apply(doc! {"a": 5, "b": 3, "_id": new}, doc! {"b": {}, "_id": old});
        assert_eq!(out, doc! {"a": 5, "b": 3, "_id": old});

        let out = apply(
            doc! {"a": 5, "b": {"c": {"d": "zzz"}}},
            doc! {"a": {"b": {"c": 123}, "e": 123}, "f": 5},
        );
        assert_eq!(out, doc! {"a": 5, "b": {"c": {"d": "zzz"}}});
    }

    #[test]
    fn replace_in_upsert_multi_needs_id() {
        let opts = UpdateOptions { upsert: true, multi: true };
        let u = UpdateApplier::new(&doc! {"a": 1}, opts);
        assert!(matches!(
            u.as_ref().map(|u| u.apply(doc! {})),
            Ok(Err(DocError::IllegalMultiUpsertReplace))
        ));
        assert!(matches!(u.map(|u| u.apply(doc! {"_id": 1})), Ok(Ok(_))));
    }

    #[test]
    fn set_then_unset_restores_absence() {
        let d = apply(doc! {"$set": {"p.q": 1}}, doc! {"p": {}});
        let d = apply(doc! {"$unset": {"p.q": ""}}, d);
        assert_eq!(d, doc! {"p": {}});
    }

    #[test]
    fn unset_and_rename_missing_are_noops() {
        let d = doc! {"a": 1, "t": 2};
        assert_eq!(apply(doc! {"$unset": {"x.y": "", "z": ""}}, d.clone()), d);
        assert_eq!(apply(doc! {"$rename": {"missing": "t"}}, d.clone()), d);
    }

    #[test]
    fn rename_into_nested_path() {
        let d = apply(doc! {"$rename": {"a.b": "c.d"}}, doc! {"a": {"b": 1}});
        assert_eq!(d, doc! {"a": {}, "c": {"d": 1}});
    }

    #[test]
    fn set_on_insert_only_for_upserted_documents_without_id() {
        let update = doc! {"$setOnInsert": {"a": 1}};
        let upsert = UpdateApplier::new(&update, UpdateOptions::upsert());
        assert_eq!(upsert.as_ref().ok().and_then(|u| u.apply(doc! {}).ok()), Some(doc! {"a": 1}));
        assert_eq!(
            upsert.ok().and_then(|u| u.apply(doc! {"_id": 7}).ok()),
            Some(doc! {"_id": 7})
        );
        assert_eq!(apply(update, doc! {}), doc! {});
    }

    #[test]
    fn inc_and_mul_coerce_non_numbers_to_zero() {
        assert_eq!(apply(doc! {"$inc": {"a": 2}}, doc! {"a": "abc"}), doc! {"a": 2});
        assert_eq!(apply(doc! {"$inc": {"a": 2}}, doc! {"a": "5"}), doc! {"a": 7.0});
        assert_eq!(apply(doc! {"$inc": {"a": 1}}, doc! {"a": "0x10"}), doc! {"a": 17.0});
        assert_eq!(apply(doc! {"$inc": {"a": 1}}, doc! {"a": "inf"}), doc! {"a": 1});
        assert_eq!(apply(doc! {"$inc": {"a": "x"}}, doc! {"a": 1}), doc! {"a": 1});
        assert_eq!(apply(doc! {"$mul": {"a": 3}}, doc! {}), doc! {"a": 0});
        assert_eq!(apply(doc! {"$mul": {"a": 3}}, doc! {"a": [1]}), doc! {"a": 0});
        assert_eq!(apply(doc! {"$mul": {"a": 1.5}}, doc! {"a": 4}), doc! {"a": 6.0});
    }

    #[test]
    fn pull_removes_elements_but_never_the_field() {
        assert_eq!(apply(doc! {"$pull": {"a": 3}}, doc! {"a": [3]}), doc! {"a": []});
        assert_eq!(apply(doc! {"$pull": {"a": 3}}, doc! {"a": []}), doc! {"a": []});
        assert_eq!(
            apply(doc! {"$pull": {"a": {"$gt": 3}}}, doc! {"a": [1, 5, 3, 9, 2]}),
            doc! {"a": [1, 3, 2]}
        );
        assert_eq!(
            apply(doc! {"$pull": {"a": {"x": 1}}}, doc! {"a": [{"x": 1}, {"x": 1, "y": 2}]}),
            doc! {"a": [{"x": 1, "y": 2}]}
        );
        assert_eq!(apply(doc! {"$pull": {"a": 1}}, doc! {"a": 1}), doc! {"a": 1});
        assert_eq!(apply(doc! {"$pull": {"m.n": 1}}, doc! {}), doc! {});
    }

    #[test]
    fn add_to_set_appends_only_new_values() {
        assert_eq!(apply(doc! {"$addToSet": {"a": 1}}, doc! {}), doc! {"a": [1]});
        assert_eq!(apply(doc! {"$addToSet": {"a": 1.0}}, doc! {"a": [1, 2]}), doc! {"a": [1, 2]});
        assert_eq!(
            apply(doc! {"$addToSet": {"a": {"k": 1}}}, doc! {"a": [{"k": 1, "j": 2}]}),
            doc! {"a": [{"k": 1, "j": 2}, {"k": 1}]}
        );
        assert_eq!(apply(doc! {"$addToSet": {"a.b": "x"}}, doc! {"a": 5}), doc! {"a": {"b": ["x"]}});
        assert_eq!(apply(doc! {"$addToSet": {"a": "x"}}, doc! {"a": "y"}), doc! {"a": ["x"]});
    }

    #[test]
    fn applier_can_be_reused() {
        let u = UpdateApplier::new(&doc! {"$inc": {"n": 1}}, UpdateOptions::multi());
        let u = u.unwrap();
        for start in 0..3 {
            assert_eq!(u.apply(doc! {"n": start}).ok(), Some(doc! {"n": start + 1}));
        }
    }
}
