//! 용량 제한 피드.
//!
//! 최신 항목이 앞에 오는 고정 용량 컬렉션. 삽입 시 용량을 넘는 가장 오래된 항목을 버린다.

/// 최신순 고정 용량 피드
#[derive(Debug, Clone)]
pub struct BoundedFeed<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedFeed<T> {
    /// 새 피드 생성 (최대 크기 지정)
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// 맨 앞에 추가하고 용량 초과분 제거
    pub fn push(&mut self, item: T) -> &[T] {
        self.items.insert(0, item);
        self.items.truncate(self.capacity);
        &self.items
    }

    /// 조건에 맞는 첫 항목을 제자리에서 교체 (위치 유지)
    ///
    /// 교체가 일어났으면 true.
    pub fn update_by<P, F>(&mut self, predicate: P, transform: F) -> bool
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&T) -> T,
    {
        match self.items.iter().position(predicate) {
            Some(index) => {
                let replacement = transform(&self.items[index]);
                self.items[index] = replacement;
                true
            }
            None => false,
        }
    }

    /// 조건에 맞는 첫 항목 제거
    pub fn remove_by<P>(&mut self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        let index = self.items.iter().position(predicate)?;
        Some(self.items.remove(index))
    }

    /// 피드 비우기
    pub fn clear(&mut self) -> &[T] {
        self.items.clear();
        &self.items
    }

    /// 현재 스냅샷 (최신순)
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// 현재 크기
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
