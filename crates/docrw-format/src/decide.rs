//! EOL-vs-Doc Decider (spec.md §4.C).

/// One member of a group of sibling specs/fields being decided together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub multiline_comment: bool,
    pub multiline_code: bool,
    pub force_doc: bool,
    pub min_code_length: usize,
    pub comment_length: usize,
    pub indent_in_spaces: usize,
    /// True for an interface's methods/embedded interfaces, which are
    /// never marked EOL regardless of fit.
    pub is_interface_member: bool,
}

impl Entity {
    fn eligible(&self) -> bool {
        !self.multiline_comment
            && !self.multiline_code
            && !self.force_doc
            && !self.is_interface_member
    }
}

fn fits(slice: &[Entity], soft_max_cols: usize) -> bool {
    let m = slice.iter().map(|e| e.min_code_length).max().unwrap_or(0);
    slice
        .iter()
        .all(|e| e.indent_in_spaces + m + 1 + e.comment_length <= soft_max_cols)
}

/// Returns, in the same order as `entities`, whether each member should
/// be rendered as a trailing EOL comment.
pub fn decide(entities: &[Entity], soft_max_cols: usize) -> Vec<bool> {
    let mut result = vec![false; entities.len()];
    if entities.is_empty() {
        return result;
    }
    if entities.len() <= 2 {
        let all_eligible = entities.iter().all(Entity::eligible);
        if all_eligible && fits(entities, soft_max_cols) {
            result.iter_mut().for_each(|b| *b = true);
        }
        return result;
    }

    let mut i = 0;
    while i < entities.len() {
        if !entities[i].eligible() {
            i += 1;
            continue;
        }
        let start = i;
        while i < entities.len() && entities[i].eligible() {
            i += 1;
        }
        let end = i;
        if end - start < 3 {
            continue;
        }
        if fits(&entities[start..end], soft_max_cols) {
            result[start..end].fill(true);
        } else {
            for w in start..=(end - 3) {
                if fits(&entities[w..w + 3], soft_max_cols) {
                    for k in w..w + 3 {
                        result[k] = true;
                    }
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(min_code: usize, comment: usize) -> Entity {
        Entity {
            multiline_comment: false,
            multiline_code: false,
            force_doc: false,
            min_code_length: min_code,
            comment_length: comment,
            indent_in_spaces: 0,
            is_interface_member: false,
        }
    }

    #[test]
    fn small_group_all_eol_when_fits() {
        let entities = vec![entity(5, 10), entity(7, 8)];
        let decided = decide(&entities, 40);
        assert_eq!(decided, vec![true, true]);
    }

    #[test]
    fn small_group_rejects_if_one_is_force_doc() {
        let mut entities = vec![entity(5, 10), entity(7, 8)];
        entities[1].force_doc = true;
        let decided = decide(&entities, 40);
        assert_eq!(decided, vec![false, false]);
    }

    #[test]
    fn large_run_marks_whole_run_when_fits() {
        let entities = vec![entity(3, 5); 4];
        let decided = decide(&entities, 40);
        assert_eq!(decided, vec![true, true, true, true]);
    }

    #[test]
    fn large_run_uses_sliding_window_when_whole_run_does_not_fit() {
        // Whole-run M=10 makes entity0's own fit test fail (0+10+1+5=16>12);
        // windows [1..4) and [2..5) share M=1 and fit (0+1+1+1=3<=12).
        let entities = vec![entity(10, 5), entity(1, 1), entity(1, 1), entity(1, 1), entity(1, 1)];
        let decided = decide(&entities, 12);
        assert_eq!(decided, vec![false, true, true, true, true]);
    }

    #[test]
    fn interface_member_never_eol() {
        let mut entities = vec![entity(3, 5); 3];
        entities.iter_mut().for_each(|e| e.is_interface_member = true);
        let decided = decide(&entities, 100);
        assert_eq!(decided, vec![false, false, false]);
    }
}
