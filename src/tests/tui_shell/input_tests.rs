    use super::*;

    #[test]
    fn edits_at_the_cursor() {
        let mut input = Input::default();
        input.set("https://x/a");
        input.move_left();
        input.insert_char('b');
        assert_eq!(input.buf, "https://x/ba");

        input.move_end();
        input.backspace();
        assert_eq!(input.buf, "https://x/b");

        input.move_home();
        input.delete();
        assert_eq!(input.buf, "ttps://x/b");
    }

    #[test]
    fn handles_multibyte_chars() {
        let mut input = Input::default();
        input.set("/sdcard/Descargas/ñ");
        input.insert_char('é');
        assert_eq!(input.buf, "/sdcard/Descargas/ñé");
        input.move_left();
        input.backspace();
        assert_eq!(input.buf, "/sdcard/Descargas/é");
        assert_eq!(input.cursor, 18);
    }

    #[test]
    fn ignores_edits_past_the_ends() {
        let mut input = Input::default();
        input.backspace();
        input.delete();
        input.move_right();
        assert_eq!(input.cursor, 0);
        assert!(input.buf.is_empty());
    }
