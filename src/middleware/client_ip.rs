use axum::http::HeaderMap;

/// 无法识别客户端时使用的标识
pub const UNKNOWN_CLIENT: &str = "unknown";

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";
const CF_CONNECTING_IP: &str = "cf-connecting-ip";

/// 从代理头中取客户端地址，优先级固定为
/// x-forwarded-for（第一个地址）> x-real-ip > cf-connecting-ip > "unknown"
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_str(headers, FORWARDED_FOR) {
        let first = forwarded.split(',').next().unwrap_or_default();
        return first.trim().to_string();
    }

    header_str(headers, REAL_IP)
        .or_else(|| header_str(headers, CF_CONNECTING_IP))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn forwarded_for_wins_and_takes_first_entry() {
        let map = headers(&[
            ("x-forwarded-for", " 203.0.113.7 , 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
            ("cf-connecting-ip", "192.0.2.9"),
        ]);
        assert_eq!(client_identifier(&map), "203.0.113.7");
    }

    #[test]
    fn real_ip_beats_cdn_header() {
        let map = headers(&[
            ("x-real-ip", "198.51.100.2"),
            ("cf-connecting-ip", "192.0.2.9"),
        ]);
        assert_eq!(client_identifier(&map), "198.51.100.2");
    }

    #[test]
    fn cdn_header_used_last() {
        let map = headers(&[("cf-connecting-ip", "192.0.2.9")]);
        assert_eq!(client_identifier(&map), "192.0.2.9");
    }

    #[test]
    fn falls_back_to_unknown() {
        assert_eq!(client_identifier(&HeaderMap::new()), UNKNOWN_CLIENT);
        let map = headers(&[("x-real-ip", "")]);
        assert_eq!(client_identifier(&map), UNKNOWN_CLIENT);
    }
}
