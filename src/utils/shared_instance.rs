use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

/// 行程內共用、延遲建立的實例。
///
/// 第一個呼叫者執行初始化，同時到達的其他呼叫者等待同一個進行中的初始化結果，
/// 不會重複建立。初始化失敗時不保留結果，下一次呼叫會重新嘗試。
pub struct SharedInstance<T> {
    cell: OnceCell<T>,
    initializations: AtomicUsize,
}

impl<T> SharedInstance<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
            initializations: AtomicUsize::new(0),
        }
    }

    pub async fn get_or_try_init<F, Fut, E>(&self, init: F) -> std::result::Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        self.cell
            .get_or_try_init(|| async move {
                self.initializations.fetch_add(1, Ordering::SeqCst);
                init().await
            })
            .await
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// 已執行的初始化次數（含失敗的嘗試）
    pub fn initializations(&self) -> usize {
        self.initializations.load(Ordering::SeqCst)
    }
}

impl<T> Default for SharedInstance<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_use_initializes_once() {
        let shared: Arc<SharedInstance<String>> = Arc::new(SharedInstance::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                let value = shared
                    .get_or_try_init(|| async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, std::io::Error>("instance".to_string())
                    })
                    .await
                    .unwrap();
                value.clone()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "instance");
        }
        assert_eq!(shared.initializations(), 1);
    }

    #[tokio::test]
    async fn test_failed_initialization_is_retried() {
        let shared: SharedInstance<u32> = SharedInstance::new();

        let first = shared
            .get_or_try_init(|| async { Err::<u32, _>("file not found") })
            .await;
        assert!(first.is_err());
        assert!(shared.get().is_none());

        let second = shared.get_or_try_init(|| async { Ok::<_, &str>(7) }).await;
        assert_eq!(*second.unwrap(), 7);
        assert_eq!(shared.initializations(), 2);
    }
}
