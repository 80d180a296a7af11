//! Argument normalization utilities.
//!
//! The dispatcher owns `--component` plus its `--ob-*` options and forwards
//! everything else to the component, in any order. clap cannot parse "known
//! args" out of a mixed list, so the raw argv is rearranged first:
//!
//! ```text
//! prog --name d1 --component methods/x --k v   =>   prog --component methods/x -- --name d1 --k v
//! ```
//!
//! Tokens are handled as `OsString` so forwarded paths that are not valid
//! UTF-8 reach the component untouched.

use std::ffi::{OsStr, OsString};

/// Dispatcher options that take a value. The last occurrence wins.
const VALUE_OPTIONS: &[&str] = &["--component", "--ob-root", "--ob-config"];

/// Dispatcher switches.
const SWITCHES: &[&str] = &["--ob-dry-run", "--ob-quiet"];

/// Help/version flags, owned by the dispatcher only when no component is given.
const INFO_FLAGS: &[&str] = &["--help", "-h", "--version", "-V"];

/// Match a dispatcher value option, spelled `--opt value` or `--opt=value`.
///
/// The `=` spelling is only recognized for UTF-8 tokens; anything else is
/// forwarded.
fn value_option(arg: &OsStr) -> Option<(&'static str, Option<OsString>)> {
    VALUE_OPTIONS.iter().find_map(|opt| {
        if arg == OsStr::new(opt) {
            Some((*opt, None))
        } else {
            arg.to_str()?
                .strip_prefix(opt)
                .and_then(|rest| rest.strip_prefix('='))
                .map(|value| (*opt, Some(OsString::from(value))))
        }
    })
}

fn switch_option(arg: &OsStr) -> Option<&'static str> {
    SWITCHES.iter().copied().find(|s| arg == OsStr::new(s))
}

fn is_info_flag(arg: &OsStr) -> bool {
    INFO_FLAGS.iter().any(|f| arg == OsStr::new(f))
}

fn has_component(args: &[OsString]) -> bool {
    args.iter()
        .take_while(|a| a.as_os_str() != "--")
        .any(|a| matches!(value_option(a), Some(("--component", _))))
}

/// Move dispatcher options in front of a `--` separator and everything else after it.
///
/// `args` is the full argv including the program name. Forwarded tokens keep
/// their relative order. An explicit `--` ends option scanning; the tokens after
/// it are forwarded verbatim.
pub fn split_dispatcher_args(args: Vec<OsString>) -> Vec<OsString> {
    let mut iter = args.into_iter();
    let Some(program) = iter.next() else {
        return Vec::new();
    };

    let rest: Vec<OsString> = iter.collect();
    let component_given = has_component(&rest);

    let mut values: Vec<(&'static str, OsString)> = Vec::new();
    let mut dangling: Vec<&'static str> = Vec::new();
    let mut switches: Vec<&'static str> = Vec::new();
    let mut info: Vec<OsString> = Vec::new();
    let mut forwarded: Vec<OsString> = Vec::new();

    let mut iter = rest.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--" {
            forwarded.extend(iter.by_ref());
            break;
        }

        if let Some((opt, inline)) = value_option(&arg) {
            let value = inline.or_else(|| iter.next());
            values.retain(|(o, _)| *o != opt);
            match value {
                Some(v) => values.push((opt, v)),
                None => dangling.push(opt),
            }
            continue;
        }

        if let Some(switch) = switch_option(&arg) {
            if !switches.contains(&switch) {
                switches.push(switch);
            }
            continue;
        }

        if !component_given && is_info_flag(&arg) {
            info.push(arg);
            continue;
        }

        forwarded.push(arg);
    }

    let mut result = vec![program];
    for (opt, value) in values {
        result.push(opt.into());
        result.push(value);
    }
    // A value option with nothing after it is left for clap to report.
    result.extend(dangling.into_iter().map(OsString::from));
    result.extend(switches.into_iter().map(OsString::from));
    result.extend(info);
    result.push("--".into());
    result.extend(forwarded);

    result
}
