use crate::GraphicsContext;

/// Info-log text together with the length the context reported for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    pub text: String,
    pub reported_length: i32,
}

impl DiagnosticLog {
    fn fetch(reported_length: i32, fetch: impl FnOnce(i32) -> String) -> Self {
        if reported_length <= 0 {
            return DiagnosticLog::default();
        }

        let mut text = fetch(reported_length);
        // The reported length includes the terminator.
        let max = reported_length as usize - 1;
        if text.len() > max {
            let mut end = max;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
        }
        while text.ends_with('\0') {
            text.pop();
        }

        DiagnosticLog {
            text,
            reported_length,
        }
    }

    pub fn for_shader<C: GraphicsContext>(ctx: &C, shader: C::Shader) -> Self {
        let length = ctx.shader_info_log_length(shader);
        DiagnosticLog::fetch(length, |length| ctx.shader_info_log(shader, length))
    }

    pub fn for_program<C: GraphicsContext>(ctx: &C, program: C::Program) -> Self {
        let length = ctx.program_info_log_length(program);
        DiagnosticLog::fetch(length, |length| ctx.program_info_log(program, length))
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[test]
fn test_zero_length_skips_fetch() {
    let log = DiagnosticLog::fetch(0, |_| panic!("fetch must not run for an empty log"));
    assert!(log.is_empty());
    assert_eq!(log.reported_length, 0);

    let log = DiagnosticLog::fetch(-1, |_| unreachable!());
    assert!(log.is_empty());
}

#[test]
fn test_fetch_respects_reported_length() {
    let log = DiagnosticLog::fetch(6, |length| {
        assert_eq!(length, 6);
        "error: trailing".to_owned()
    });
    assert_eq!(log.text, "error");

    let log = DiagnosticLog::fetch(4, |_| "ab\0".to_owned());
    assert_eq!(log.text, "ab");

    // Never split a multi-byte character.
    let log = DiagnosticLog::fetch(3, |_| "aé".to_owned());
    assert_eq!(log.text, "a");
}
