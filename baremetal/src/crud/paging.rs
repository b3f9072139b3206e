use crate::api::{ApiResult, ListOptions, Page};
use std::future::Future;
use tfplug::ResourceData;
use tracing::debug;

/// Follow page cursors until the service stops returning one.
///
/// `limit` is forwarded unchanged on every call. Any call error aborts the
/// whole listing; partial results are discarded.
pub async fn collect_pages<T, F, Fut>(options: ListOptions, mut fetch: F) -> ApiResult<Vec<T>>
where
    F: FnMut(ListOptions) -> Fut,
    Fut: Future<Output = ApiResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut request = options;
    let mut pages = 0usize;

    loop {
        let page = fetch(request.clone()).await?;
        pages += 1;
        let has_next = page.has_next();
        items.extend(page.items);

        if !has_next {
            break;
        }
        request.page = page.next_page;
    }

    debug!(pages, items = items.len(), "Collected list results");
    Ok(items)
}

/// Starting cursor and page size from a data source's `page` / `limit`
/// attributes
pub fn list_options(d: &ResourceData) -> ListOptions {
    ListOptions {
        page: d.get_ok_string("page"),
        limit: d
            .get_ok_int("limit")
            .and_then(|l| u32::try_from(l).ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use serde_json::json;
    use std::sync::Mutex;
    use tfplug::DynamicValue;

    fn pages() -> Vec<Page<u32>> {
        vec![
            Page {
                items: vec![1, 2],
                next_page: Some("p2".to_string()),
            },
            Page {
                items: vec![3],
                next_page: Some("p3".to_string()),
            },
            Page::last(vec![4, 5]),
        ]
    }

    #[tokio::test]
    async fn follows_cursors_in_order() {
        let seen = Mutex::new(Vec::new());
        let pages = pages();

        let items = collect_pages(ListOptions::with_limit(2), |opts| {
            seen.lock().unwrap().push(opts.clone());
            let idx = match opts.page.as_deref() {
                None => 0,
                Some("p2") => 1,
                _ => 2,
            };
            let page = pages[idx].clone();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|o| o.limit == Some(2)));
        assert_eq!(seen[1].page.as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn error_discards_partial_results() {
        let mut calls = 0;
        let result: ApiResult<Vec<u32>> = collect_pages(ListOptions::default(), |_| {
            calls += 1;
            let n = calls;
            async move {
                if n == 1 {
                    Ok(Page {
                        items: vec![1],
                        next_page: Some("next".to_string()),
                    })
                } else {
                    Err(ApiError::Transport("connection reset".into()))
                }
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn options_from_attributes() {
        let d = ResourceData::from_state(DynamicValue::from_json(json!({
            "page": "abc",
            "limit": 25
        })));
        let opts = list_options(&d);
        assert_eq!(opts.page.as_deref(), Some("abc"));
        assert_eq!(opts.limit, Some(25));

        assert_eq!(list_options(&ResourceData::new()), ListOptions::default());
    }
}
