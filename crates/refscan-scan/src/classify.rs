//! Property classification.

use refscan_core::SerializedProperty;

/// Decide whether a property is a dangling object reference.
///
/// A property is missing when it is declared as an object reference, its
/// target does not resolve, and it still carries a non-zero stored id. A
/// reference that was never assigned has no stored id and is not missing.
pub fn is_missing(property: Option<&SerializedProperty>) -> bool {
    let Some(property) = property else {
        return false;
    };

    property.is_object_reference() && property.value.is_none() && property.instance_id != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use refscan_core::{ObjectRef, PropertyKind};

    #[test]
    fn test_none_is_not_missing() {
        assert!(!is_missing(None));
    }

    #[test]
    fn test_dangling_reference_is_missing() {
        let prop = SerializedProperty::dangling("m_Material", 14502);
        assert!(is_missing(Some(&prop)));
    }

    #[test]
    fn test_unassigned_reference_is_not_missing() {
        let prop = SerializedProperty::unassigned("m_Material");
        assert!(!is_missing(Some(&prop)));
    }

    #[test]
    fn test_live_reference_is_not_missing() {
        let prop = SerializedProperty::reference("m_Mesh", ObjectRef::new(88, "Cube"));
        assert!(!is_missing(Some(&prop)));
    }

    #[test]
    fn test_other_kinds_are_never_missing() {
        let mut prop = SerializedProperty::new("m_Count", PropertyKind::Integer);
        prop.instance_id = 5;
        assert!(!is_missing(Some(&prop)));

        let mut managed = SerializedProperty::new("m_Data", PropertyKind::ManagedReference);
        managed.instance_id = 9;
        assert!(!is_missing(Some(&managed)));
    }

    #[test]
    fn test_classification_is_repeatable() {
        let prop = SerializedProperty::dangling("m_Target", 3);
        let before = prop.clone();
        assert_eq!(is_missing(Some(&prop)), is_missing(Some(&prop)));
        assert_eq!(prop, before);
    }
}
