use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};

/// Page selection for list endpoints, 1-based. Defaults to the first
/// page of 10 when absent.
pub struct Pagination {
    page_num: u64,
    page_size: u64,
}

impl Pagination {
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn skip(&self) -> u64 {
        (self.page_num - 1) * self.page_size
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Pagination {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let page_num = match req.query_value::<u64>("page_num").unwrap_or(Ok(1)) {
            Ok(page_num) if page_num >= 1 => page_num,
            _ => return request::Outcome::Failure((Status::BadRequest, ())),
        };
        let page_size = match req.query_value::<u64>("page_size").unwrap_or(Ok(10)) {
            Ok(page_size) if page_size >= 1 => page_size,
            _ => return request::Outcome::Failure((Status::BadRequest, ())),
        };
        request::Outcome::Success(Self {
            page_num,
            page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_is_zero_based() {
        let pagination = Pagination {
            page_num: 1,
            page_size: 10,
        };
        assert_eq!(pagination.skip(), 0);

        let pagination = Pagination {
            page_num: 3,
            page_size: 10,
        };
        assert_eq!(pagination.skip(), 20);
    }
}
