//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;

use arvancloud_dns_provider::{
    Address, ArvanCloudProvider, Caa, Cname, DnsRecordProvider, Mx, Record, RecordDeleter,
    RecordGetter, Srv, Txt,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 生成 SRV 记录专用的测试名称（格式：_service._tcp）
pub fn generate_srv_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}._tcp", &uuid.to_string()[..8])
}

/// 支持测试的记录类型
#[derive(Debug, Clone, Copy)]
pub enum TestRecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Srv,
    Caa,
}

/// 生成测试记录（名称为 `name`，TTL 固定 600 秒）
pub fn make_test_record(record_type: TestRecordType, name: &str) -> Record {
    let name = name.to_string();
    let ttl = Duration::from_secs(600);
    match record_type {
        TestRecordType::A => Record::Address(Address {
            name,
            ttl,
            ip: Ipv4Addr::new(192, 0, 2, 1).into(),
        }),
        TestRecordType::Aaaa => Record::Address(Address {
            name,
            ttl,
            ip: Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1).into(),
        }),
        TestRecordType::Cname => Record::Cname(Cname {
            name,
            ttl,
            target: "target1.example.com".to_string(),
        }),
        TestRecordType::Mx => Record::Mx(Mx {
            name,
            ttl,
            preference: 10,
            target: "mail1.example.com".to_string(),
        }),
        TestRecordType::Txt => Record::Txt(Txt {
            name,
            ttl,
            text: "integration-test".to_string(),
        }),
        TestRecordType::Srv => Record::Srv(Srv {
            name,
            ttl,
            priority: 0,
            weight: 5,
            port: 443,
            target: "srv1.example.com".to_string(),
        }),
        TestRecordType::Caa => Record::Caa(Caa {
            name,
            ttl,
            flags: 0,
            tag: "issue".to_string(),
            value: "letsencrypt.org".to_string(),
        }),
    }
}

/// 测试上下文 - 封装 Provider 和测试域名
pub struct TestContext {
    pub provider: Arc<dyn DnsRecordProvider>,
    pub zone: String,
}

impl TestContext {
    /// 创建 ArvanCloud 测试上下文
    pub fn arvancloud() -> Option<Self> {
        let api_key = env::var("ARVANCLOUD_API_KEY").ok()?;
        let zone = env::var("TEST_DOMAIN").ok()?;

        let provider = ArvanCloudProvider::builder(api_key)
            .operation_timeout(Duration::from_secs(120))
            .build()
            .ok()?;

        Some(Self {
            provider: Arc::new(provider),
            zone,
        })
    }

    /// 查找名称匹配的记录
    pub async fn find_records(&self, name: &str) -> Vec<Record> {
        self.provider
            .get_records(&self.zone)
            .await
            .map(|records| records.into_iter().filter(|r| r.name() == name).collect())
            .unwrap_or_default()
    }

    /// 清理测试记录
    pub async fn cleanup_records(&self, records: &[Record]) {
        let _ = self.provider.delete_records(&self.zone, records).await;
    }

    /// 查找并清理所有测试记录（以 _test- 开头的记录）
    pub async fn cleanup_all_test_records(&self) {
        if let Ok(records) = self.provider.get_records(&self.zone).await {
            let stale: Vec<Record> = records
                .into_iter()
                .filter(|r| r.name().starts_with("_test-"))
                .collect();
            self.cleanup_records(&stale).await;
        }
    }
}
