    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(validate_tree_path("urls").is_ok());
        assert!(validate_tree_path("team_2-links").is_ok());
        assert!(validate_tree_path(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn rejects_other_characters_and_lengths() {
        assert!(validate_tree_path("").is_err());
        assert!(validate_tree_path(&"a".repeat(65)).is_err());
        assert!(validate_tree_path("a.b").is_err());
        assert!(validate_tree_path("..").is_err());
        assert!(validate_tree_path("ñ").is_err());
    }
