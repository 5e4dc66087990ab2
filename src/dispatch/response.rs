/// The outcome of handling one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Generic failure response. The body never carries error details;
    /// those go to the diagnostic log.
    pub fn failure(status: u16) -> Self {
        let body = match status {
            400 => "Bad Request",
            404 => "Not Found",
            _ => "Internal Server Error",
        };
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_bodies_are_generic() {
        assert_eq!(Response::failure(404).body, "Not Found");
        assert_eq!(Response::failure(400).body, "Bad Request");
        assert_eq!(Response::failure(500).body, "Internal Server Error");
        assert!(!Response::failure(500).is_success());
        assert!(Response::ok("hi").is_success());
    }
}
