// ==========================================
// 需求预测与补货计划系统 - 在途订单队列
// ==========================================
// 职责: 按 (到货日期, 触发序号) 排序的最小优先队列
// ==========================================

use crate::domain::projection::PendingOrder;
use chrono::NaiveDate;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// 队列元素,仅按 (到货日期, 触发序号) 比较
#[derive(Debug, Clone)]
struct QueuedOrder(PendingOrder);

impl QueuedOrder {
    fn key(&self) -> (NaiveDate, u64) {
        (self.0.arrival_date, self.0.sequence)
    }
}

impl PartialEq for QueuedOrder {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueuedOrder {}

impl PartialOrd for QueuedOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

// ==========================================
// PendingOrderQueue - 在途订单队列
// ==========================================
#[derive(Debug, Default)]
pub struct PendingOrderQueue {
    heap: BinaryHeap<Reverse<QueuedOrder>>,
    next_sequence: u64,
    in_transit: f64, // 在途合计,随入队/收货增减
}

impl PendingOrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增在途订单
    ///
    /// # 返回
    /// 入队的订单 (含分配的触发序号)
    pub fn push(&mut self, triggered_on: NaiveDate, arrival_date: NaiveDate, quantity: f64) -> PendingOrder {
        let order = PendingOrder {
            sequence: self.next_sequence,
            triggered_on,
            arrival_date,
            quantity,
        };
        self.next_sequence += 1;
        self.in_transit += quantity;
        self.heap.push(Reverse(QueuedOrder(order.clone())));
        order
    }

    /// 收货: 取出到货日期 <= date 的全部订单
    ///
    /// # 返回
    /// 按到货顺序排列的已到货订单
    pub fn receive_due(&mut self, date: NaiveDate) -> Vec<PendingOrder> {
        let mut received = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.0.arrival_date > date {
                break;
            }
            if let Some(Reverse(QueuedOrder(order))) = self.heap.pop() {
                self.in_transit -= order.quantity;
                received.push(order);
            }
        }
        if self.heap.is_empty() {
            self.in_transit = 0.0;
        }
        received
    }

    /// 在途合计
    pub fn total_quantity(&self) -> f64 {
        self.in_transit
    }

    /// 在途订单 (按到货顺序)
    pub fn orders(&self) -> Vec<PendingOrder> {
        let mut orders: Vec<PendingOrder> = self.heap.iter().map(|r| r.0 .0.clone()).collect();
        orders.sort_by_key(|o| (o.arrival_date, o.sequence));
        orders
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
