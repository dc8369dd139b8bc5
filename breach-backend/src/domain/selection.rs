// src/domain/selection.rs

//! 一括操作のための選択状態
//!
//! 選択は常に表示中のレコードの部分集合に保つ。

use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<Uuid>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 選択されていなければ追加、されていれば外す
    pub fn toggle(&mut self, id: Uuid) {
        if let Some(pos) = self.ids.iter().position(|selected| *selected == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// 表示中のレコードをすべて選択（既存の選択は置き換える）
    pub fn select_all<I>(&mut self, displayed: I)
    where
        I: IntoIterator<Item = Uuid>,
    {
        self.ids.clear();
        for id in displayed {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// 表示中に存在しないIDを選択から外す
    pub fn retain_displayed(&mut self, displayed: &[Uuid]) {
        self.ids.retain(|id| displayed.contains(id));
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let id = Uuid::new_v4();
        let mut selection = Selection::new();

        selection.toggle(id);
        assert!(selection.contains(&id));

        selection.toggle(id);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_replaces_selection() {
        let stale = Uuid::new_v4();
        let displayed = vec![Uuid::new_v4(), Uuid::new_v4()];
        let mut selection = Selection::new();
        selection.toggle(stale);

        selection.select_all(displayed.clone());
        assert_eq!(selection.ids(), displayed.as_slice());
        assert!(!selection.contains(&stale));
    }

    #[test]
    fn test_retain_displayed_keeps_subset() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let mut selection = Selection::new();
        selection.toggle(a);
        selection.toggle(b);
        selection.toggle(c);

        selection.retain_displayed(&[c, a]);
        assert_eq!(selection.ids(), &[a, c]);
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.select_all(vec![Uuid::new_v4()]);
        selection.clear();
        assert!(selection.is_empty());
    }
}
