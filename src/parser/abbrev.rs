/// Whether `candidate` begins with a valid abbreviation of `full`.
///
/// Stata lets keywords shrink down to a fixed minimum, so a candidate matches
/// when it starts with any prefix of `full` at least as long as `shortest`.
/// With `require_boundary` the abbreviation must be followed by a space or by
/// the end of the candidate; without it a pure prefix test is enough. This is
/// the single primitive used for every keyword class (modifiers, block
/// openers), so the matching rules cannot drift apart.
pub fn starts_with_abbrev(
    candidate: &str,
    full: &str,
    shortest: &str,
    require_boundary: bool,
) -> bool {
    for len in shortest.len()..=full.len() {
        let prefix = &full[..len];
        if !candidate.starts_with(prefix) {
            // Longer prefixes of `full` cannot match either.
            return false;
        }
        if !require_boundary {
            return true;
        }
        match candidate.as_bytes().get(len) {
            None | Some(b' ') => return true,
            _ => {}
        }
    }
    false
}
